//! Integration tests for the tick-measured timer queue.

use respite_tick::TimerQueue;

#[test]
fn test_nothing_fires_before_deadline() {
    let mut q = TimerQueue::new();
    q.schedule_at(100, "a");
    assert!(q.drain_due(99).is_empty());
    assert_eq!(q.len(), 1);
}

#[test]
fn test_fires_exactly_at_deadline() {
    let mut q = TimerQueue::new();
    let h = q.schedule_at(100, "a");
    let fired = q.drain_due(100);
    assert_eq!(fired, vec![(h, "a")]);
    assert!(q.is_empty());
    assert!(!q.is_pending(h));
}

#[test]
fn test_drain_orders_by_deadline_then_schedule_order() {
    let mut q = TimerQueue::new();
    let late = q.schedule_at(30, "late");
    let first = q.schedule_at(10, "first");
    let second = q.schedule_at(10, "second");

    let fired = q.drain_due(50);
    assert_eq!(fired, vec![(first, "first"), (second, "second"), (late, "late")]);
}

#[test]
fn test_fired_timer_fires_once() {
    let mut q = TimerQueue::new();
    q.schedule_at(5, ());
    assert_eq!(q.drain_due(5).len(), 1);
    assert!(q.drain_due(500).is_empty());
}

#[test]
fn test_cancel_after_fire_is_noop() {
    let mut q = TimerQueue::new();
    let h = q.schedule_at(5, 7u32);
    q.drain_due(10);
    assert_eq!(q.cancel(h), None);
}

#[test]
fn test_cancelled_timer_never_fires() {
    let mut q = TimerQueue::new();
    let h = q.schedule_at(5, "gone");
    let keep = q.schedule_at(5, "kept");
    assert_eq!(q.cancel(h), Some("gone"));

    let fired = q.drain_due(5);
    assert_eq!(fired, vec![(keep, "kept")]);
}

#[test]
fn test_next_deadline_and_deadline_lookup() {
    let mut q = TimerQueue::new();
    assert_eq!(q.next_deadline(), None);
    let a = q.schedule_at(40, ());
    let b = q.schedule_at(20, ());
    assert_eq!(q.next_deadline(), Some(20));
    assert_eq!(q.deadline(a), Some(40));
    q.cancel(b);
    assert_eq!(q.next_deadline(), Some(40));
    assert_eq!(q.deadline(b), None);
}

#[test]
fn test_clear_cancels_everything() {
    let mut q = TimerQueue::new();
    let a = q.schedule_at(1, ());
    q.schedule_at(2, ());
    assert_eq!(q.clear(), 2);
    assert!(q.is_empty());
    assert!(!q.is_pending(a));
    assert!(q.drain_due(10).is_empty());
}

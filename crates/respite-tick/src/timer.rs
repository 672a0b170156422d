//! One-shot timers on the tick clock.
//!
//! A [`TimerQueue`] holds payloads keyed by deadline. The owner advances
//! time by calling [`TimerQueue::drain_due`]; nothing fires on its own.
//! That keeps firing on the same task as everything else that touches
//! the payloads.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use tracing::trace;

use crate::Tick;

/// Handle to a scheduled timer. Handles are never reused, so a stale
/// handle can't cancel a newer timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T-{}", self.0)
    }
}

/// Deadline-ordered queue of one-shot timers with cancel-by-handle.
#[derive(Debug)]
pub struct TimerQueue<T> {
    next_id: u64,
    /// `(deadline, id)` sorts by deadline, then scheduling order.
    due: BTreeMap<(Tick, u64), T>,
    /// id → deadline, for O(log n) cancel.
    deadlines: HashMap<u64, Tick>,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            due: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }

    /// Schedules `payload` to fire once `now >= deadline`.
    pub fn schedule_at(&mut self, deadline: Tick, payload: T) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.due.insert((deadline, id), payload);
        self.deadlines.insert(id, deadline);
        trace!(timer = id, deadline, "timer scheduled");
        TimerHandle(id)
    }

    /// Cancels a pending timer and returns its payload.
    ///
    /// Returns `None` if the timer already fired or was already
    /// cancelled; calling this twice is harmless.
    pub fn cancel(&mut self, handle: TimerHandle) -> Option<T> {
        let deadline = self.deadlines.remove(&handle.0)?;
        trace!(timer = handle.0, deadline, "timer cancelled");
        self.due.remove(&(deadline, handle.0))
    }

    /// `true` if the timer has neither fired nor been cancelled.
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.deadlines.contains_key(&handle.0)
    }

    /// Deadline of a pending timer.
    pub fn deadline(&self, handle: TimerHandle) -> Option<Tick> {
        self.deadlines.get(&handle.0).copied()
    }

    /// Removes and returns every timer whose deadline is `<= now`,
    /// earliest first. Timers sharing a deadline come out in the order
    /// they were scheduled.
    pub fn drain_due(&mut self, now: Tick) -> Vec<(TimerHandle, T)> {
        let mut fired = Vec::new();
        while let Some(entry) = self.due.first_entry() {
            let (deadline, id) = *entry.key();
            if deadline > now {
                break;
            }
            let payload = entry.remove();
            self.deadlines.remove(&id);
            fired.push((TimerHandle(id), payload));
        }
        fired
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Tick> {
        self.due.keys().next().map(|(deadline, _)| *deadline)
    }

    pub fn len(&self) -> usize {
        self.due.len()
    }

    pub fn is_empty(&self) -> bool {
        self.due.is_empty()
    }

    /// Cancels everything. Returns how many timers were pending.
    pub fn clear(&mut self) -> usize {
        let n = self.due.len();
        self.due.clear();
        self.deadlines.clear();
        n
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

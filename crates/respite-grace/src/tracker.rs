//! The grace tracker: player → grace record, plus expiry timers.

use std::collections::HashMap;
use std::time::Duration;

use respite_protocol::{EndReason, Notice, NoticeKind, PlayerId};
use respite_tick::{Tick, TimerHandle, TimerQueue};
use tracing::{debug, info};

use crate::{GraceConfig, GraceRecord};

/// Tracks which players are in a grace period and when each one ends.
///
/// Time is measured on a tick clock that the owner advances with
/// [`advance`](Self::advance) / [`advance_to`](Self::advance_to). Expiry
/// timers fire only from those calls, so as long as one task owns the
/// tracker, an expiry can never interleave with a `start` or `end`.
///
/// ## Lifecycle
///
/// ```text
/// start() ──→ [active] ──(duration elapses)──→ advance_to() fires ──→ [gone]
///                │  ↑                                                  ↑
///                │  └── start() again: old timer cancelled, replaced   │
///                └──── end() / revoke(): timer cancelled ──────────────┘
/// ```
#[derive(Debug)]
pub struct GraceTracker {
    config: GraceConfig,
    now: Tick,
    records: HashMap<PlayerId, GraceRecord>,
    timers: TimerQueue<PlayerId>,
}

impl GraceTracker {
    /// Creates an empty tracker with its clock at tick 0.
    pub fn new(config: GraceConfig) -> Self {
        Self {
            config,
            now: 0,
            records: HashMap::new(),
            timers: TimerQueue::new(),
        }
    }

    pub fn config(&self) -> &GraceConfig {
        &self.config
    }

    /// Current tick on the tracker's clock.
    pub fn now(&self) -> Tick {
        self.now
    }

    /// Starts (or restarts) a grace period for `player`.
    ///
    /// An existing record is replaced and its timer cancelled, so the old
    /// timer can never expire the new period. Returns the notice telling
    /// the player how long they are protected.
    pub fn start(&mut self, player: PlayerId) -> Notice {
        if self.end(player, EndReason::Replaced).is_some() {
            debug!(%player, tick = self.now, "previous grace period replaced");
        }

        let deadline = self.now.saturating_add(self.config.duration_ticks());
        let handle = self.timers.schedule_at(deadline, player);
        self.records
            .insert(player, GraceRecord::new(player, self.now, handle));

        info!(
            %player,
            tick = self.now,
            duration_secs = self.config.duration_secs,
            "grace period started"
        );

        Notice::new(
            player,
            NoticeKind::GraceStarted {
                seconds: self.config.duration_secs,
            },
        )
    }

    /// `true` if `player` currently has a grace period.
    pub fn is_active(&self, player: PlayerId) -> bool {
        self.records.contains_key(&player)
    }

    /// The live record for `player`, if any.
    pub fn record(&self, player: PlayerId) -> Option<&GraceRecord> {
        self.records.get(&player)
    }

    /// Time left in `player`'s grace period. Zero if not active.
    pub fn remaining(&self, player: PlayerId) -> Duration {
        let Some(record) = self.records.get(&player) else {
            return Duration::ZERO;
        };
        let left = self
            .config
            .duration_ticks()
            .saturating_sub(record.elapsed_ticks(self.now));
        let tps = u64::from(self.config.ticks_per_second.max(1));
        Duration::from_millis(left.saturating_mul(1_000) / tps)
    }

    /// Whole seconds left, rounded down. Zero if not active.
    pub fn remaining_secs(&self, player: PlayerId) -> u64 {
        self.remaining(player).as_secs()
    }

    /// Ends `player`'s grace period, cancelling its timer.
    ///
    /// Returns the removed record, or `None` if there was nothing to end.
    /// Calling it again, or after the timer fired, is a no-op.
    pub fn end(&mut self, player: PlayerId, reason: EndReason) -> Option<GraceRecord> {
        let mut record = self.records.remove(&player)?;
        if let Some(handle) = record.expiry.take() {
            self.timers.cancel(handle);
        }
        if reason != EndReason::Replaced {
            info!(
                %player,
                %reason,
                tick = self.now,
                held_ticks = record.elapsed_ticks(self.now),
                "grace period ended"
            );
        }
        Some(record)
    }

    /// Ends `player`'s grace period and builds the notice explaining why.
    pub fn revoke(&mut self, player: PlayerId, reason: EndReason) -> Option<Notice> {
        self.end(player, reason)
            .map(|record| Notice::new(record.player, NoticeKind::Revoked { reason }))
    }

    /// Ends every grace period, e.g. at shutdown. Notices are ordered by
    /// player ID.
    pub fn end_all(&mut self, reason: EndReason) -> Vec<Notice> {
        let notices: Vec<Notice> = self
            .active_players()
            .into_iter()
            .filter_map(|player| self.revoke(player, reason))
            .collect();
        let leftover = self.timers.clear();
        if leftover > 0 {
            debug!(leftover, "discarded orphaned expiry timers");
        }
        notices
    }

    /// Moves the clock forward by `ticks` and fires due expiries.
    pub fn advance(&mut self, ticks: u64) -> Vec<Notice> {
        self.advance_to(self.now.saturating_add(ticks))
    }

    /// Moves the clock to `tick` and fires every expiry due by then.
    ///
    /// The clock never runs backwards; an earlier `tick` only fires what
    /// is already due.
    pub fn advance_to(&mut self, tick: Tick) -> Vec<Notice> {
        if tick > self.now {
            self.now = tick;
        }
        self.timers
            .drain_due(self.now)
            .into_iter()
            .filter_map(|(handle, player)| self.expire(handle, player))
            .collect()
    }

    fn expire(&mut self, handle: TimerHandle, player: PlayerId) -> Option<Notice> {
        match self.records.get(&player) {
            Some(record) if record.owns_timer(handle) => {
                self.records.remove(&player);
                info!(%player, tick = self.now, reason = "expired", "grace period ended");
                Some(Notice::new(player, NoticeKind::Expired))
            }
            _ => {
                debug!(%player, timer = %handle, "stale expiry ignored");
                None
            }
        }
    }

    /// Players currently in grace, sorted by ID.
    pub fn active_players(&self) -> Vec<PlayerId> {
        let mut players: Vec<PlayerId> = self.records.keys().copied().collect();
        players.sort();
        players
    }

    /// Number of live grace periods.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of expiry timers still pending.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }
}

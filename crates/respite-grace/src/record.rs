//! The per-player grace record.

use respite_protocol::PlayerId;
use respite_tick::{Tick, TimerHandle};

/// One player's live grace period.
///
/// Owned by [`GraceTracker`](crate::GraceTracker). Created on respawn,
/// dropped on expiry or early end. There is never more than one per player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraceRecord {
    /// Who is protected.
    pub player: PlayerId,
    /// Tick at which the grace period began.
    pub started_at: Tick,
    /// Pending expiry timer. `None` once the timer has fired or been cancelled.
    pub expiry: Option<TimerHandle>,
}

impl GraceRecord {
    pub fn new(player: PlayerId, started_at: Tick, expiry: TimerHandle) -> Self {
        Self {
            player,
            started_at,
            expiry: Some(expiry),
        }
    }

    /// Ticks since the grace period began.
    pub fn elapsed_ticks(&self, now: Tick) -> u64 {
        now.saturating_sub(self.started_at)
    }

    /// `true` if `handle` is this record's pending expiry timer.
    pub fn owns_timer(&self, handle: TimerHandle) -> bool {
        self.expiry == Some(handle)
    }
}

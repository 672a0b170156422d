//! Event handlers: what each host event does to grace state.
//!
//! The host subscribes these to its own event bus. Each handler returns
//! an [`EventOutcome`]: the cancel flag (meaningful only for damage) and
//! the chat notices to deliver.

use respite_protocol::{
    BlockTarget, ClickAction, EndReason, Entity, HostEvent, Notice, NoticeKind, PlayerId, Verdict,
};
use tracing::debug;

use crate::GraceTracker;

/// Result of handling one host event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventOutcome {
    pub verdict: Verdict,
    pub notices: Vec<Notice>,
}

impl EventOutcome {
    fn allow(notices: impl IntoIterator<Item = Notice>) -> Self {
        Self {
            verdict: Verdict::Allow,
            notices: notices.into_iter().collect(),
        }
    }
}

/// Applies host events to a [`GraceTracker`].
///
/// Revocation rules:
///
/// | Event | Ends grace when |
/// |---|---|
/// | block place / break | always |
/// | block interact | right-click on a block with an inventory, or any anvil, without a block in hand |
/// | entity interact | the entity holds an inventory |
/// | damage | the player is the attacker |
#[derive(Debug)]
pub struct GracePolicy {
    tracker: GraceTracker,
}

impl GracePolicy {
    pub fn new(tracker: GraceTracker) -> Self {
        Self { tracker }
    }

    pub fn tracker(&self) -> &GraceTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut GraceTracker {
        &mut self.tracker
    }

    pub fn into_tracker(self) -> GraceTracker {
        self.tracker
    }

    /// Dispatches any host event to its handler.
    pub fn handle(&mut self, event: &HostEvent) -> EventOutcome {
        match *event {
            HostEvent::Respawn { player } => EventOutcome::allow([self.on_respawn(player)]),
            HostEvent::Damage { victim, attacker } => self.on_damage(victim, attacker),
            HostEvent::BlockPlace { player } => EventOutcome::allow(self.on_block_place(player)),
            HostEvent::BlockBreak { player } => EventOutcome::allow(self.on_block_break(player)),
            HostEvent::BlockInteract {
                player,
                action,
                block,
                block_in_hand,
            } => EventOutcome::allow(self.on_block_interact(player, action, block, block_in_hand)),
            HostEvent::EntityInteract {
                player,
                target_has_inventory,
            } => EventOutcome::allow(self.on_entity_interact(player, target_has_inventory)),
        }
    }

    /// A respawn always (re)starts grace.
    pub fn on_respawn(&mut self, player: PlayerId) -> Notice {
        self.tracker.start(player)
    }

    pub fn on_block_place(&mut self, player: PlayerId) -> Option<Notice> {
        self.tracker.revoke(player, EndReason::BlockPlace)
    }

    pub fn on_block_break(&mut self, player: PlayerId) -> Option<Notice> {
        self.tracker.revoke(player, EndReason::BlockBreak)
    }

    /// Opening a container or using an anvil ends grace. Clicks that
    /// would place the held block are left to `on_block_place`.
    pub fn on_block_interact(
        &mut self,
        player: PlayerId,
        action: ClickAction,
        block: Option<BlockTarget>,
        block_in_hand: bool,
    ) -> Option<Notice> {
        if !self.tracker.is_active(player) {
            return None;
        }
        let uses_block = action == ClickAction::RightClickBlock
            && !block_in_hand
            && block.is_some_and(|b| b.has_inventory || b.material.is_anvil());
        if !uses_block {
            return None;
        }
        self.tracker.revoke(player, EndReason::BlockInteract)
    }

    pub fn on_entity_interact(
        &mut self,
        player: PlayerId,
        target_has_inventory: bool,
    ) -> Option<Notice> {
        if !target_has_inventory {
            return None;
        }
        self.tracker.revoke(player, EndReason::EntityInteract)
    }

    /// Decides whether a damage event is cancelled.
    ///
    /// A protected victim takes no damage and keeps its grace. An attacker
    /// in grace loses it on the spot, and that hit is cancelled too. A
    /// player who damages themselves is their own attacker.
    pub fn on_damage(&mut self, victim: Entity, attacker: Option<Entity>) -> EventOutcome {
        let mut outcome = EventOutcome::default();

        if let Some(player) = victim.as_player().filter(|p| self.tracker.is_active(*p)) {
            outcome.verdict = Verdict::Cancel;
            debug!(%player, "damage blocked by grace period");
            outcome.notices.push(Notice::new(
                player,
                NoticeKind::Protected {
                    remaining_secs: self.tracker.remaining_secs(player),
                },
            ));
        }

        let Some(damager) = attacker.and_then(|a| a.as_player()) else {
            return outcome;
        };

        if outcome.verdict.is_cancel() {
            outcome
                .notices
                .push(Notice::new(damager, NoticeKind::TargetProtected));
        }

        if let Some(notice) = self.tracker.revoke(damager, EndReason::Attack) {
            outcome.verdict = Verdict::Cancel;
            outcome.notices.push(notice);
        }

        outcome
    }
}

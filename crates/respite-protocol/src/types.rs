//! Core types exchanged between the host game server and Respite.
//!
//! Everything here is plain data: the host reports what happened
//! ([`HostEvent`]), and Respite answers with a [`Verdict`] for damage and
//! a list of [`Notice`]s to show players.

use serde::{Deserialize, Serialize};

use std::fmt;

/// Prefix prepended to every chat line sent to a player.
pub const NOTICE_PREFIX: &str = "[Respite] ";

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// A unique identifier for a player.
///
/// Newtype over `u64` so a player ID can't be confused with a tick count
/// or a timer handle. Serialized as the bare number (`#[serde(transparent)]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// Something that can deal or receive damage.
///
/// Only players can hold a grace period; every other entity (mobs,
/// projectiles without a shooter, the environment) is `Other`.
///
/// JSON: `{"player": 4}` or `"other"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
    Player(PlayerId),
    Other,
}

impl Entity {
    /// Returns the player ID if this entity is a player.
    pub fn as_player(&self) -> Option<PlayerId> {
        match self {
            Self::Player(id) => Some(*id),
            Self::Other => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Block interaction details
// ---------------------------------------------------------------------------

/// Block materials the grace policy cares about.
///
/// Anvils have no inventory of their own but still let a player repair
/// gear, so every wear stage counts as an interaction that ends grace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    Anvil,
    ChippedAnvil,
    DamagedAnvil,
    Other,
}

impl Material {
    /// `true` for any anvil, regardless of wear.
    pub fn is_anvil(&self) -> bool {
        matches!(self, Self::Anvil | Self::ChippedAnvil | Self::DamagedAnvil)
    }
}

/// The kind of click that produced an interaction event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickAction {
    RightClickBlock,
    RightClickAir,
    LeftClickBlock,
    LeftClickAir,
    /// Stepping on a pressure plate, trampling farmland, etc.
    Physical,
}

/// The block a player clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockTarget {
    pub material: Material,
    /// Whether the block holds an inventory (chest, furnace, hopper, ...).
    #[serde(default)]
    pub has_inventory: bool,
}

// ---------------------------------------------------------------------------
// HostEvent (inbound)
// ---------------------------------------------------------------------------

/// An event reported by the host game server.
///
/// Internally tagged JSON, e.g. `{"type":"block_break","player":3}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    /// A player respawned after death.
    Respawn { player: PlayerId },

    /// An entity is about to take damage. `attacker` is `None` for
    /// environmental damage (fall, lava, starvation).
    Damage {
        victim: Entity,
        #[serde(default)]
        attacker: Option<Entity>,
    },

    /// A player placed a block.
    BlockPlace { player: PlayerId },

    /// A player broke a block.
    BlockBreak { player: PlayerId },

    /// A player clicked something with their hand.
    BlockInteract {
        player: PlayerId,
        action: ClickAction,
        #[serde(default)]
        block: Option<BlockTarget>,
        /// The player is holding a placeable block (the click will place it).
        #[serde(default)]
        block_in_hand: bool,
    },

    /// A player right-clicked an entity.
    EntityInteract {
        player: PlayerId,
        #[serde(default)]
        target_has_inventory: bool,
    },
}

impl HostEvent {
    /// The player who performed the action, if the event has one.
    ///
    /// For damage events this is the attacking player.
    pub fn player(&self) -> Option<PlayerId> {
        match self {
            Self::Respawn { player }
            | Self::BlockPlace { player }
            | Self::BlockBreak { player }
            | Self::BlockInteract { player, .. }
            | Self::EntityInteract { player, .. } => Some(*player),
            Self::Damage { attacker, .. } => attacker.and_then(|a| a.as_player()),
        }
    }

    /// Short name used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Respawn { .. } => "respawn",
            Self::Damage { .. } => "damage",
            Self::BlockPlace { .. } => "block_place",
            Self::BlockBreak { .. } => "block_break",
            Self::BlockInteract { .. } => "block_interact",
            Self::EntityInteract { .. } => "entity_interact",
        }
    }
}

// ---------------------------------------------------------------------------
// EndReason
// ---------------------------------------------------------------------------

/// Why a grace period ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// The configured duration elapsed.
    Expired,
    BlockPlace,
    BlockBreak,
    /// Opened an inventory block or used an anvil.
    BlockInteract,
    /// Interacted with an entity that holds an inventory.
    EntityInteract,
    /// Attacked another entity.
    Attack,
    /// A new respawn replaced the record.
    Replaced,
    /// The service is stopping.
    Shutdown,
}

impl EndReason {
    /// `true` if the player's own action cut the grace period short.
    pub fn is_early(&self) -> bool {
        matches!(
            self,
            Self::BlockPlace
                | Self::BlockBreak
                | Self::BlockInteract
                | Self::EntityInteract
                | Self::Attack
        )
    }
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Expired => "expired",
            Self::BlockPlace => "block_place",
            Self::BlockBreak => "block_break",
            Self::BlockInteract => "block_interact",
            Self::EntityInteract => "entity_interact",
            Self::Attack => "attack",
            Self::Replaced => "replaced",
            Self::Shutdown => "shutdown",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Notice / Verdict (outbound)
// ---------------------------------------------------------------------------

/// What a [`Notice`] tells the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NoticeKind {
    /// Grace began and lasts `seconds`.
    GraceStarted { seconds: u64 },
    /// Someone tried to hurt you; you are safe for `remaining_secs` more.
    Protected { remaining_secs: u64 },
    /// You tried to hurt a player who is still in grace.
    TargetProtected,
    /// Your grace was cut short.
    Revoked { reason: EndReason },
    /// Your grace ran out naturally.
    Expired,
}

/// A chat line addressed to a single player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub player: PlayerId,
    pub kind: NoticeKind,
}

impl Notice {
    pub fn new(player: PlayerId, kind: NoticeKind) -> Self {
        Self { player, kind }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(NOTICE_PREFIX)?;
        match &self.kind {
            NoticeKind::GraceStarted { seconds } => {
                write!(f, "You are now invulnerable for {seconds} seconds!")
            }
            NoticeKind::Protected { remaining_secs } => {
                write!(f, "You are protected from damage for {remaining_secs} seconds!")
            }
            NoticeKind::TargetProtected => f.write_str("This player can't take damage yet!"),
            NoticeKind::Expired => f.write_str("You are no longer on grace period!"),
            NoticeKind::Revoked { reason } => match reason {
                EndReason::BlockPlace => revoked(f, "placed a block"),
                EndReason::BlockBreak => revoked(f, "broke a block"),
                EndReason::BlockInteract => revoked(f, "interacted with a block"),
                EndReason::EntityInteract => revoked(f, "interacted with an entity"),
                EndReason::Attack => revoked(f, "are attacking"),
                EndReason::Shutdown => f.write_str("Your grace period was ended by the server."),
                EndReason::Expired | EndReason::Replaced => {
                    f.write_str("You are no longer on grace period!")
                }
            },
        }
    }
}

fn revoked(f: &mut fmt::Formatter<'_>, what: &str) -> fmt::Result {
    write!(f, "You are no longer invulnerable because you {what}!")
}

/// The host's cancel flag for a damage event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Let the event proceed.
    #[default]
    Allow,
    /// Cancel the event (no damage is applied).
    Cancel,
}

impl Verdict {
    pub fn is_cancel(&self) -> bool {
        matches!(self, Self::Cancel)
    }
}

// =========================================================================
// Tests
// =========================================================================

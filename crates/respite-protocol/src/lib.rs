//! Event and message types for Respite.
//!
//! This crate defines what the host game server and the grace tracker
//! say to each other:
//!
//! - **Inbound** ([`HostEvent`]): respawns, damage, block and entity
//!   interactions reported by the host's event bus.
//! - **Outbound** ([`Notice`], [`Verdict`]): chat lines for players and
//!   the cancel flag for damage events.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those values are
//!   converted to/from bytes when the host lives out of process.
//! - **Errors** ([`ProtocolError`]).
//!
//! ```text
//! Host event bus → HostEvent → GracePolicy → EventOutcome → Host
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    BlockTarget, ClickAction, EndReason, Entity, HostEvent, Material, Notice,
    NoticeKind, PlayerId, Verdict, NOTICE_PREFIX,
};

//! # Respite
//!
//! Temporary damage immunity for freshly respawned players.
//!
//! A host game server forwards its events (respawn, damage, block and
//! entity interactions) to a [`GraceHandle`]. Respite answers each damage
//! event with a [`Verdict`] and streams chat [`Notice`]s back on a channel.
//! Grace periods expire on their own after the configured duration, or
//! early when the player builds, opens a container, or attacks.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use respite::prelude::*;
//!
//! # async fn run() -> Result<(), RespiteError> {
//! let (grace, mut notices) = RespiteBuilder::new()
//!     .config_file("config.yml")
//!     .spawn();
//!
//! grace.dispatch(HostEvent::Respawn { player: PlayerId(7) }).await?;
//! while let Some(notice) = notices.recv().await {
//!     println!("{} <- {notice}", notice.player);
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod service;

pub use error::RespiteError;
pub use service::{GraceHandle, NoticeReceiver, NoticeSender, RespiteBuilder};

pub use respite_grace::{ConfigError, EventOutcome, GraceConfig, GracePolicy, GraceTracker};
pub use respite_protocol::{
    BlockTarget, ClickAction, Codec, EndReason, Entity, HostEvent, JsonCodec, Material, Notice,
    NoticeKind, PlayerId, ProtocolError, Verdict,
};
pub use respite_tick::{TickConfig, TickPolicy};

pub mod prelude {
    //! Everything a host integration usually needs.
    pub use crate::{
        BlockTarget, ClickAction, Codec, EndReason, Entity, GraceConfig, GraceHandle, HostEvent,
        JsonCodec, Material, Notice, NoticeKind, PlayerId, RespiteBuilder, RespiteError,
        TickConfig, Verdict,
    };
}

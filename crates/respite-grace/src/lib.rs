//! Grace period tracking for Respite.
//!
//! A player who respawns is immune to damage for a configured duration.
//! Building, opening inventories, using anvils, or attacking ends that
//! immunity early.
//!
//! # Key types
//!
//! - [`GraceTracker`]: owns every live [`GraceRecord`] and its expiry timer
//! - [`GracePolicy`]: the event handlers a host wires to its event bus
//! - [`GraceConfig`]: duration and tick rate, loadable from YAML
//!
//! The tracker is single-owner and not thread-safe. It expects to be
//! driven from one task, with the clock advanced from that same task
//! (the `respite` crate runs it inside an actor task).

mod config;
mod error;
mod policy;
mod record;
mod tracker;

pub use config::GraceConfig;
pub use error::ConfigError;
pub use policy::{EventOutcome, GracePolicy};
pub use record::GraceRecord;
pub use tracker::GraceTracker;

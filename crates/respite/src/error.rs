//! Unified error type for Respite.

use respite_grace::ConfigError;
use respite_protocol::ProtocolError;

/// Top-level error wrapping the per-crate errors.
///
/// Grace lookups never fail: a player without grace is a normal answer.
/// Errors come only from decoding host traffic, loading config strictly,
/// or talking to a service that has already stopped.
#[derive(Debug, thiserror::Error)]
pub enum RespiteError {
    /// Host traffic could not be encoded or decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The config file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The grace service task has shut down.
    #[error("grace service is unavailable")]
    Unavailable,
}

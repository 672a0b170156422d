//! Error types for the protocol layer.
//!
//! Each crate in Respite defines its own error enum. A `ProtocolError`
//! always means the problem is in encoding or decoding host traffic,
//! never in grace bookkeeping.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust value into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust value).
    ///
    /// Common causes: malformed JSON, an unknown event `type`, or a
    /// missing `player` field.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The event decoded fine but makes no sense, e.g. an empty line
    /// handed to the decoder.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}

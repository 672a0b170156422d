//! Codec trait and implementations for host traffic.
//!
//! When the host game server runs in another process, events arrive as
//! bytes and notices leave as bytes. The protocol layer doesn't care how
//! they are serialized; it just needs something that implements
//! [`Codec`].
//!
//! Currently we provide [`JsonCodec`], one JSON document per event.

use serde::{de::DeserializeOwned, Serialize};

use crate::{HostEvent, ProtocolError};

/// A codec that can encode Rust values to bytes and decode bytes back.
///
/// `Send + Sync + 'static` so a codec can live inside a long-running
/// Tokio task next to the grace service handle.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;

    /// Decodes a single host event, rejecting blank input up front.
    ///
    /// Line-oriented hosts send keep-alive newlines; those are an
    /// [`ProtocolError::InvalidMessage`] rather than a decode failure so
    /// callers can skip them quietly.
    fn decode_event(&self, data: &[u8]) -> Result<HostEvent, ProtocolError> {
        if data.iter().all(u8::is_ascii_whitespace) {
            return Err(ProtocolError::InvalidMessage("empty event".into()));
        }
        self.decode(data)
    }
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// This is behind the `json` feature flag (enabled by default).
///
/// ## Example
///
/// ```rust
/// use respite_protocol::{Codec, HostEvent, JsonCodec, PlayerId};
///
/// let codec = JsonCodec;
/// let event = codec
///     .decode_event(br#"{"type":"respawn","player":7}"#)
///     .unwrap();
/// assert_eq!(event, HostEvent::Respawn { player: PlayerId(7) });
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

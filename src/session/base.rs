//! Base traits and types for the duplex session relay.
//!
//! This module defines the seams between the three parties of a live
//! session: the browser-facing client channel, the upstream Gemini Live
//! session, and the relay that pumps events between them. The relay is
//! written entirely against these traits so its concurrency and teardown
//! behavior can be exercised with in-memory fakes.

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

/// Errors raised by the upstream Gemini Live session.
#[derive(Debug, Error, PartialEq)]
pub enum UpstreamError {
    /// The initial WebSocket handshake or setup write failed
    #[error("Upstream connection failed: {0}")]
    ConnectionFailed(String),

    /// A send or receive failed after the session was established
    #[error("Upstream transport error: {0}")]
    Transport(String),

    /// An upstream frame could not be serialized or parsed
    #[error("Upstream serialization error: {0}")]
    Serialization(String),
}

/// Errors raised by the browser-facing client channel.
#[derive(Debug, Error, PartialEq)]
pub enum ChannelError {
    /// The client WebSocket transport failed
    #[error("Client transport error: {0}")]
    Transport(String),

    /// The client sent a frame that could not be decoded
    #[error("Malformed client frame: {0}")]
    MalformedFrame(String),
}

/// The error a relay pump dies with.
///
/// A clean disconnect on either side is not an error; pumps report it as
/// end-of-stream and the relay tears down normally.
#[derive(Debug, Error, PartialEq)]
pub enum RelayError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Client(#[from] ChannelError),
}

// =============================================================================
// Relay State
// =============================================================================

/// Lifecycle of a session relay.
///
/// `Connecting` moves straight to `Closed` when the upstream handshake
/// fails; `Active` is the only state in which the pumps run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelayState {
    /// Constructed, upstream not yet dialed
    #[default]
    Idle,
    /// Upstream handshake in flight
    Connecting,
    /// Both pumps running
    Active,
    /// First pump finished, sibling being cancelled and halves closed
    Closing,
    /// Both sides released
    Closed,
}

impl fmt::Display for RelayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayState::Idle => write!(f, "Idle"),
            RelayState::Connecting => write!(f, "Connecting"),
            RelayState::Active => write!(f, "Active"),
            RelayState::Closing => write!(f, "Closing"),
            RelayState::Closed => write!(f, "Closed"),
        }
    }
}

// =============================================================================
// Event Types
// =============================================================================

/// A client request after protocol decoding.
///
/// Audio arrives on the wire as base64 inside a JSON text frame; by the
/// time it reaches the relay it is raw PCM 16-bit mono at 16 kHz.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundClientEvent {
    /// A typed text message for the model
    Text(String),
    /// A chunk of microphone audio (PCM16, 16 kHz, mono)
    Audio(Bytes),
}

/// A JSON frame sent to the browser client.
///
/// Upstream events are forwarded opaquely under a `gemini` tag; the only
/// other frame the gateway ever sends is a single error notice before
/// closing the socket.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ClientEnvelope {
    /// `{"type":"gemini","data":<upstream event>}`
    Gemini {
        #[serde(rename = "type")]
        kind: GeminiTag,
        data: Value,
    },
    /// `{"error":"<message>"}`
    Error { error: String },
}

/// Marker for the `"gemini"` envelope tag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum GeminiTag {
    #[serde(rename = "gemini")]
    Gemini,
}

impl ClientEnvelope {
    /// Wrap an opaque upstream event for delivery to the client.
    pub fn gemini(data: Value) -> Self {
        ClientEnvelope::Gemini {
            kind: GeminiTag::Gemini,
            data,
        }
    }

    /// Build the pre-close error frame.
    pub fn error(message: impl Into<String>) -> Self {
        ClientEnvelope::Error {
            error: message.into(),
        }
    }
}

// =============================================================================
// Upstream Seams
// =============================================================================

/// Dials the upstream service and yields its two halves.
///
/// Consumed by value: a connector is good for exactly one session.
#[async_trait]
pub trait UpstreamConnector: Send + 'static {
    type Sink: UpstreamSink;
    type Events: UpstreamEvents;

    /// Establish the upstream session, including any setup handshake.
    async fn connect(self) -> Result<(Self::Sink, Self::Events), UpstreamError>;
}

/// Write half of an upstream session. Single writer by construction:
/// only the inbound pump (and, at teardown, the relay) ever holds it.
#[async_trait]
pub trait UpstreamSink: Send + 'static {
    /// Forward a text message, one wire frame per call.
    async fn send_text(&mut self, text: &str) -> Result<(), UpstreamError>;

    /// Forward an audio chunk (PCM16, 16 kHz, mono), one wire frame per call.
    async fn send_audio(&mut self, pcm16: Bytes) -> Result<(), UpstreamError>;

    /// Forward a video frame (JPEG), one wire frame per call.
    async fn send_video(&mut self, jpeg: Bytes) -> Result<(), UpstreamError>;

    /// Release the upstream session.
    ///
    /// Idempotent: repeated calls and calls after a transport failure are
    /// no-ops, never errors.
    async fn close(&mut self);
}

/// Read half of an upstream session. Events arrive lazily and in order;
/// `Ok(None)` means the upstream closed and the stream will not restart.
#[async_trait]
pub trait UpstreamEvents: Send + 'static {
    async fn next_event(&mut self) -> Result<Option<Value>, UpstreamError>;
}

// =============================================================================
// Client Seams
// =============================================================================

/// Read half of the browser connection.
#[async_trait]
pub trait ClientReceiver: Send + 'static {
    /// Next decoded client request.
    ///
    /// `Ok(None)` on a clean client disconnect — not an error. Malformed
    /// frames and transport failures surface as [`ChannelError`].
    async fn next_request(&mut self) -> Result<Option<InboundClientEvent>, ChannelError>;
}

/// Write half of the browser connection.
#[async_trait]
pub trait ClientSender: Send + 'static {
    /// Deliver one envelope as a JSON text frame. May fail once the peer
    /// is gone; callers decide whether that is fatal.
    async fn send(&mut self, envelope: &ClientEnvelope) -> Result<(), ChannelError>;

    /// Close the client socket. Idempotent.
    async fn close(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_relay_state_display() {
        assert_eq!(RelayState::Idle.to_string(), "Idle");
        assert_eq!(RelayState::Connecting.to_string(), "Connecting");
        assert_eq!(RelayState::Active.to_string(), "Active");
        assert_eq!(RelayState::Closing.to_string(), "Closing");
        assert_eq!(RelayState::Closed.to_string(), "Closed");
    }

    #[test]
    fn test_relay_state_default_is_idle() {
        assert_eq!(RelayState::default(), RelayState::Idle);
    }

    #[test]
    fn test_gemini_envelope_shape() {
        let envelope = ClientEnvelope::gemini(json!({"output": {"text": "hi"}}));
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            value,
            json!({"type": "gemini", "data": {"output": {"text": "hi"}}})
        );
    }

    #[test]
    fn test_error_envelope_shape() {
        let envelope = ClientEnvelope::error("Missing GOOGLE_API_KEY");
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value, json!({"error": "Missing GOOGLE_API_KEY"}));
    }

    #[test]
    fn test_error_display() {
        let err = UpstreamError::ConnectionFailed("dns".to_string());
        assert!(err.to_string().contains("connection failed"));

        let err = ChannelError::MalformedFrame("bad base64".to_string());
        assert!(err.to_string().contains("Malformed"));
    }

    #[test]
    fn test_relay_error_is_transparent() {
        let err: RelayError = UpstreamError::Transport("reset".to_string()).into();
        assert_eq!(err.to_string(), "Upstream transport error: reset");

        let err: RelayError = ChannelError::Transport("reset".to_string()).into();
        assert_eq!(err.to_string(), "Client transport error: reset");
    }
}

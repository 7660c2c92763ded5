//! Browser-facing WebSocket protocol.
//!
//! Clients send JSON text frames tagged with a `type` field:
//!
//! - `{"type":"text","text":"..."}` — a typed message
//! - `{"type":"audio","pcm16":"<base64>"}` — a microphone chunk
//!   (PCM 16-bit mono, 16 kHz)
//!
//! The gateway replies with `{"type":"gemini","data":...}` envelopes and,
//! on fatal errors, a single `{"error":"..."}` frame before closing.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::session::{ChannelError, InboundClientEvent};

/// Incoming client frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LiveIncomingMessage {
    /// Typed text for the model
    #[serde(rename = "text")]
    Text { text: String },

    /// Base64-encoded PCM16 audio chunk
    #[serde(rename = "audio")]
    Audio { pcm16: String },
}

impl TryFrom<LiveIncomingMessage> for InboundClientEvent {
    type Error = ChannelError;

    fn try_from(message: LiveIncomingMessage) -> Result<Self, ChannelError> {
        match message {
            LiveIncomingMessage::Text { text } => Ok(InboundClientEvent::Text(text)),
            LiveIncomingMessage::Audio { pcm16 } => BASE64_STANDARD
                .decode(pcm16.as_bytes())
                .map(|decoded| InboundClientEvent::Audio(Bytes::from(decoded)))
                .map_err(|e| ChannelError::MalformedFrame(format!("invalid base64 audio: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_message_deserialization() {
        let message: LiveIncomingMessage =
            serde_json::from_str(r#"{"type":"text","text":"hello"}"#).unwrap();
        assert_eq!(
            message,
            LiveIncomingMessage::Text {
                text: "hello".to_string()
            }
        );
        let event = InboundClientEvent::try_from(message).unwrap();
        assert_eq!(event, InboundClientEvent::Text("hello".to_string()));
    }

    #[test]
    fn test_audio_message_decodes_base64() {
        let message: LiveIncomingMessage =
            serde_json::from_str(r#"{"type":"audio","pcm16":"AAECAw=="}"#).unwrap();
        let event = InboundClientEvent::try_from(message).unwrap();
        assert_eq!(
            event,
            InboundClientEvent::Audio(Bytes::from_static(&[0, 1, 2, 3]))
        );
    }

    #[test]
    fn test_audio_silence_chunk_round_trips() {
        // A typical capture chunk: 4096 bytes of PCM16 silence.
        let silence = vec![0u8; 4096];
        let json = serde_json::json!({
            "type": "audio",
            "pcm16": BASE64_STANDARD.encode(&silence),
        });
        let message: LiveIncomingMessage = serde_json::from_value(json).unwrap();
        let event = InboundClientEvent::try_from(message).unwrap();
        assert_eq!(event, InboundClientEvent::Audio(Bytes::from(silence)));
    }

    #[test]
    fn test_bad_base64_is_a_malformed_frame() {
        let message = LiveIncomingMessage::Audio {
            pcm16: "not base64!!".to_string(),
        };
        let err = InboundClientEvent::try_from(message).unwrap_err();
        assert!(matches!(err, ChannelError::MalformedFrame(_)));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let result: Result<LiveIncomingMessage, _> =
            serde_json::from_str(r#"{"type":"video","jpeg":"..."}"#);
        assert!(result.is_err());
    }
}

//! Wire frames for the Gemini Live WebSocket protocol.
//!
//! Every frame is a JSON text message. The session opens with a single
//! `setup` frame; all subsequent client-to-model traffic is an `input`
//! frame carrying exactly one of text, audio or video. Binary media is
//! base64 inside the JSON envelope.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde::Serialize;

use super::config::LiveConfig;

/// MIME type for input audio (PCM 16-bit mono at 16 kHz).
pub const AUDIO_PCM16_MIME: &str = "audio/pcm;rate=16000";

/// MIME type for input video frames.
pub const VIDEO_JPEG_MIME: &str = "image/jpeg";

// =============================================================================
// Setup
// =============================================================================

/// One-time session setup frame, sent immediately after connect.
///
/// `{"setup":{"model":...,"response":{"modalities":["AUDIO","TEXT"],"instructions":...}}}`
#[derive(Debug, Clone, Serialize)]
pub struct SetupFrame {
    pub setup: Setup,
}

#[derive(Debug, Clone, Serialize)]
pub struct Setup {
    pub model: String,
    pub response: ResponseSpec,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseSpec {
    pub modalities: Vec<&'static str>,
    pub instructions: String,
}

impl SetupFrame {
    pub fn new(config: &LiveConfig) -> Self {
        Self {
            setup: Setup {
                model: config.model.clone(),
                response: ResponseSpec {
                    modalities: vec!["AUDIO", "TEXT"],
                    instructions: config.instructions.clone(),
                },
            },
        }
    }
}

// =============================================================================
// Input
// =============================================================================

/// A client-to-model input frame: `{"input":{...}}`.
#[derive(Debug, Clone, Serialize)]
pub struct InputFrame {
    pub input: InputPayload,
}

/// The payload variants of an input frame. Externally tagged, so each
/// serializes as `{"text":...}`, `{"audio":{...}}` or `{"video":{...}}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputPayload {
    Text(String),
    Audio(MediaBlob),
    Video(MediaBlob),
}

/// Base64-encoded media with its MIME type.
#[derive(Debug, Clone, Serialize)]
pub struct MediaBlob {
    pub mime_type: &'static str,
    pub data: String,
}

impl InputFrame {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            input: InputPayload::Text(text.into()),
        }
    }

    pub fn audio(pcm16: &[u8]) -> Self {
        Self {
            input: InputPayload::Audio(MediaBlob {
                mime_type: AUDIO_PCM16_MIME,
                data: BASE64_STANDARD.encode(pcm16),
            }),
        }
    }

    pub fn video(jpeg: &[u8]) -> Self {
        Self {
            input: InputPayload::Video(MediaBlob {
                mime_type: VIDEO_JPEG_MIME,
                data: BASE64_STANDARD.encode(jpeg),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::live::config::DEFAULT_INSTRUCTIONS;
    use serde_json::json;

    #[test]
    fn test_setup_frame_shape() {
        let config = LiveConfig::new("k", "models/gemini-2.5-flash");
        let frame = SetupFrame::new(&config);
        let value = serde_json::to_value(&frame).unwrap();
        assert_eq!(
            value,
            json!({
                "setup": {
                    "model": "models/gemini-2.5-flash",
                    "response": {
                        "modalities": ["AUDIO", "TEXT"],
                        "instructions": DEFAULT_INSTRUCTIONS,
                    }
                }
            })
        );
    }

    #[test]
    fn test_text_input_shape() {
        let value = serde_json::to_value(InputFrame::text("hello")).unwrap();
        assert_eq!(value, json!({"input": {"text": "hello"}}));
    }

    #[test]
    fn test_audio_input_shape() {
        let value = serde_json::to_value(InputFrame::audio(&[0, 1, 2, 3])).unwrap();
        assert_eq!(
            value,
            json!({
                "input": {
                    "audio": {
                        "mime_type": "audio/pcm;rate=16000",
                        "data": "AAECAw==",
                    }
                }
            })
        );
    }

    #[test]
    fn test_video_input_shape() {
        let value = serde_json::to_value(InputFrame::video(&[0xFF, 0xD8])).unwrap();
        assert_eq!(
            value,
            json!({
                "input": {
                    "video": {
                        "mime_type": "image/jpeg",
                        "data": "/9g=",
                    }
                }
            })
        );
    }

    #[test]
    fn test_audio_encoding_round_trips_silence() {
        let silence = vec![0u8; 4096];
        let frame = InputFrame::audio(&silence);
        let InputPayload::Audio(blob) = frame.input else {
            panic!("expected audio payload");
        };
        let decoded = BASE64_STANDARD.decode(blob.data).unwrap();
        assert_eq!(decoded, silence);
    }
}

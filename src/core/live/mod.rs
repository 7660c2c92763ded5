//! Gemini Live upstream session.
//!
//! The Live API is a bidirectional WebSocket: the gateway sends a setup
//! frame followed by input frames (text, base64 PCM16 audio, base64 JPEG
//! video) and receives a stream of JSON events that are forwarded to the
//! client untouched.

pub mod client;
pub mod config;
pub mod messages;

pub use client::{GeminiConnector, GeminiEvents, GeminiLiveSession, GeminiSender};
pub use config::{
    DEFAULT_GEMINI_MODEL, DEFAULT_INSTRUCTIONS, GEMINI_LIVE_WS_URL, LiveConfig,
    MAX_UPSTREAM_FRAME_SIZE, PCM16_SAMPLE_RATE,
};
pub use messages::{AUDIO_PCM16_MIME, InputFrame, SetupFrame, VIDEO_JPEG_MIME};

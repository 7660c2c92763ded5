//! Configuration for the Gemini Live upstream session.

/// Gemini Live WebSocket endpoint (v1alpha bidi streaming).
pub const GEMINI_LIVE_WS_URL: &str =
    "wss://generativelanguage.googleapis.com/ws/google.ai.generativelanguage.v1alpha.LLMService/LiveSession";

/// Default model when `GEMINI_MODEL` is not set.
pub const DEFAULT_GEMINI_MODEL: &str = "models/gemini-2.5-flash";

/// System instructions sent in the setup frame.
pub const DEFAULT_INSTRUCTIONS: &str = "You are a helpful assistant.";

/// Frame/message size bound for the upstream socket (32 MB).
///
/// Gemini Live streams large consolidated audio messages; the
/// tungstenite defaults (16 MB) are too small for them.
pub const MAX_UPSTREAM_FRAME_SIZE: usize = 32 * 1024 * 1024;

/// Input audio format expected by the Live API.
pub const PCM16_SAMPLE_RATE: u32 = 16_000;

/// Configuration for one upstream session.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveConfig {
    /// Google API key, passed as a query parameter on the WebSocket URL
    pub api_key: String,
    /// Model identifier (e.g. "models/gemini-2.5-flash")
    pub model: String,
    /// System instructions for the model
    pub instructions: String,
}

impl LiveConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
        }
    }

    /// Full connection URL with the credential attached.
    pub(crate) fn ws_url(&self) -> String {
        format!("{GEMINI_LIVE_WS_URL}?key={}", self.api_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ws_url_carries_the_key() {
        let config = LiveConfig::new("abc123", DEFAULT_GEMINI_MODEL);
        let url = config.ws_url();
        assert!(url.starts_with("wss://generativelanguage.googleapis.com/"));
        assert!(url.ends_with("?key=abc123"));
    }

    #[test]
    fn test_new_fills_default_instructions() {
        let config = LiveConfig::new("k", "models/custom");
        assert_eq!(config.model, "models/custom");
        assert_eq!(config.instructions, DEFAULT_INSTRUCTIONS);
    }
}

pub mod live;

// Re-export commonly used types for convenience
pub use live::{GeminiConnector, GeminiLiveSession, LiveConfig};

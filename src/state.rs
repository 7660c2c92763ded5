//! Shared application state.

use crate::config::ServerConfig;

/// State shared across request handlers via `Arc`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Server configuration loaded at startup
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }
}

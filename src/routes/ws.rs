//! Live WebSocket route configuration
//!
//! This module configures the WebSocket endpoint that relays browser
//! sessions to the Gemini Live API.

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::handlers::live::live_handler;
use crate::state::AppState;
use std::sync::Arc;

/// Create the live WebSocket router
///
/// # Endpoint
///
/// `GET /ws` - WebSocket upgrade for a Gemini Live relay session
///
/// # Protocol
///
/// After WebSocket upgrade, clients send JSON text frames:
///
/// ```json
/// {"type": "text", "text": "hello"}
/// {"type": "audio", "pcm16": "<base64 PCM16 @ 16kHz>"}
/// ```
///
/// Server responds with:
/// - `{"type": "gemini", "data": ...}` for every upstream event
/// - `{"error": "..."}` once, before closing, on fatal failures
pub fn create_ws_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ws", get(live_handler))
        .layer(TraceLayer::new_for_http())
}

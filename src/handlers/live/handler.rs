//! Live WebSocket handler.
//!
//! Upgrades `/ws` connections and hands each socket to a session manager
//! built from the server configuration. One relay per connection; the
//! handler's only other job is logging the outcome.

use axum::{
    extract::{State, WebSocketUpgrade, ws::WebSocket},
    response::Response,
};
use std::sync::Arc;
use tracing::{info, warn};

use super::channel::split_client_socket;
use crate::session::{SessionConfig, SessionManager};
use crate::state::AppState;

/// Maximum WebSocket frame size (10 MB)
const MAX_WS_FRAME_SIZE: usize = 10 * 1024 * 1024;

/// Maximum WebSocket message size (10 MB)
const MAX_WS_MESSAGE_SIZE: usize = 10 * 1024 * 1024;

/// Live WebSocket handler
///
/// Upgrades the HTTP connection to WebSocket and relays all traffic to a
/// Gemini Live session for the lifetime of the connection.
pub async fn live_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    info!("live WebSocket connection upgrade requested");

    ws.max_frame_size(MAX_WS_FRAME_SIZE)
        .max_message_size(MAX_WS_MESSAGE_SIZE)
        .on_upgrade(move |socket| handle_live_socket(socket, state))
}

/// Handle the live WebSocket connection
async fn handle_live_socket(socket: WebSocket, state: Arc<AppState>) {
    info!("live WebSocket connection established");

    let (client_rx, client_tx) = split_client_socket(socket);
    let manager = SessionManager::new(SessionConfig {
        api_key: state.config.google_api_key.clone(),
        model: state.config.gemini_model.clone(),
    });

    if let Err(err) = manager.run(client_rx, client_tx).await {
        warn!(error = %err, "live session ended with error");
    } else {
        info!("live session ended");
    }
}

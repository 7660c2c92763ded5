//! Live session WebSocket endpoint.
//!
//! The browser connects to `/ws`, sends `text`/`audio` frames, and
//! receives the upstream Gemini event stream wrapped in `gemini`
//! envelopes. See [`messages`] for the exact frame shapes.

pub mod channel;
pub mod handler;
pub mod messages;

pub use channel::{WsClientReceiver, WsClientSender, split_client_socket};
pub use handler::live_handler;
pub use messages::LiveIncomingMessage;

//! Per-connection duplex session relay.
//!
//! A session ties one browser WebSocket to one upstream Gemini Live
//! WebSocket. [`SessionManager`] admits connections, [`SessionRelay`] pumps
//! events in both directions until either side terminates, and the seam
//! traits in [`base`] keep the whole thing testable without sockets.

pub mod base;
pub mod manager;
pub mod relay;

pub use base::{
    ChannelError, ClientEnvelope, ClientReceiver, ClientSender, InboundClientEvent, RelayError,
    RelayState, UpstreamConnector, UpstreamError, UpstreamEvents, UpstreamSink,
};
pub use manager::{MISSING_CREDENTIAL_ERROR, SessionConfig, SessionManager};
pub use relay::SessionRelay;

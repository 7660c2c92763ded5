//! Session admission and lifecycle.
//!
//! The manager owns the credential/model configuration and runs one relay
//! per accepted client connection. Sessions are fully isolated: no shared
//! mutable state, no connection limits, no cross-session coordination.

use tracing::{info, warn};
use uuid::Uuid;

use super::base::{ClientEnvelope, ClientReceiver, ClientSender, RelayError, UpstreamConnector};
use super::relay::SessionRelay;
use crate::core::live::{GeminiConnector, LiveConfig};

/// Error frame text sent when the gateway has no upstream credential.
pub const MISSING_CREDENTIAL_ERROR: &str = "Missing GOOGLE_API_KEY";

/// Per-session upstream configuration, derived from [`ServerConfig`] at
/// startup and passed in explicitly so sessions can be exercised with fake
/// credentials.
///
/// [`ServerConfig`]: crate::config::ServerConfig
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Upstream credential. Absence is a per-connection error, reported to
    /// each client in a single error frame.
    pub api_key: Option<String>,
    /// Model identifier sent in the upstream setup frame.
    pub model: String,
}

/// Runs relays for incoming client connections.
pub struct SessionManager {
    config: SessionConfig,
}

impl SessionManager {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    /// Run a session for one client connection to completion.
    pub async fn run<Rx, Tx>(&self, client_rx: Rx, client_tx: Tx) -> Result<(), RelayError>
    where
        Rx: ClientReceiver,
        Tx: ClientSender,
    {
        self.run_with(client_rx, client_tx, GeminiConnector::new)
            .await
    }

    /// Run a session with a caller-supplied upstream connector.
    ///
    /// When the credential is missing the factory is never invoked: the
    /// client gets exactly one error frame and the socket is closed.
    pub(crate) async fn run_with<Rx, Tx, C, F>(
        &self,
        client_rx: Rx,
        mut client_tx: Tx,
        make_connector: F,
    ) -> Result<(), RelayError>
    where
        Rx: ClientReceiver,
        Tx: ClientSender,
        C: UpstreamConnector,
        F: FnOnce(LiveConfig) -> C,
    {
        let session_id = Uuid::new_v4();

        let Some(api_key) = self.config.api_key.clone() else {
            warn!(%session_id, "rejecting session: no upstream credential configured");
            let frame = ClientEnvelope::error(MISSING_CREDENTIAL_ERROR);
            if let Err(err) = client_tx.send(&frame).await {
                warn!(%session_id, error = %err, "client gone before error frame was delivered");
            }
            client_tx.close().await;
            return Ok(());
        };

        let connector = make_connector(LiveConfig::new(api_key, self.config.model.clone()));
        info!(%session_id, model = %self.config.model, "session starting");

        let result = SessionRelay::new(client_rx, client_tx).run(connector).await;
        match &result {
            Ok(()) => info!(%session_id, "session finished"),
            Err(err) => warn!(%session_id, error = %err, "session finished with error"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::base::{ChannelError, InboundClientEvent, UpstreamError, UpstreamEvents, UpstreamSink};
    use async_trait::async_trait;
    use bytes::Bytes;
    use serde_json::Value;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};
    use tokio_test::assert_ok;

    struct IdleClient;

    #[async_trait]
    impl ClientReceiver for IdleClient {
        async fn next_request(&mut self) -> Result<Option<InboundClientEvent>, ChannelError> {
            Ok(None)
        }
    }

    #[derive(Clone, Default)]
    struct RecordingSender {
        sent: Arc<Mutex<Vec<ClientEnvelope>>>,
        closed: Arc<AtomicBool>,
    }

    #[async_trait]
    impl ClientSender for RecordingSender {
        async fn send(&mut self, envelope: &ClientEnvelope) -> Result<(), ChannelError> {
            self.sent.lock().unwrap().push(envelope.clone());
            Ok(())
        }

        async fn close(&mut self) {
            self.closed.store(true, Ordering::SeqCst);
        }
    }

    struct NoopSink;

    #[async_trait]
    impl UpstreamSink for NoopSink {
        async fn send_text(&mut self, _text: &str) -> Result<(), UpstreamError> {
            Ok(())
        }
        async fn send_audio(&mut self, _pcm16: Bytes) -> Result<(), UpstreamError> {
            Ok(())
        }
        async fn send_video(&mut self, _jpeg: Bytes) -> Result<(), UpstreamError> {
            Ok(())
        }
        async fn close(&mut self) {}
    }

    struct EmptyEvents;

    #[async_trait]
    impl UpstreamEvents for EmptyEvents {
        async fn next_event(&mut self) -> Result<Option<Value>, UpstreamError> {
            Ok(None)
        }
    }

    struct NoopConnector;

    #[async_trait]
    impl UpstreamConnector for NoopConnector {
        type Sink = NoopSink;
        type Events = EmptyEvents;

        async fn connect(self) -> Result<(NoopSink, EmptyEvents), UpstreamError> {
            Ok((NoopSink, EmptyEvents))
        }
    }

    #[tokio::test]
    async fn test_missing_credential_sends_one_error_frame_and_closes() {
        let manager = SessionManager::new(SessionConfig {
            api_key: None,
            model: "models/gemini-2.5-flash".to_string(),
        });
        let recorder = RecordingSender::default();
        let dialed = Arc::new(AtomicBool::new(false));

        let dialed_flag = dialed.clone();
        let result = manager
            .run_with(IdleClient, recorder.clone(), move |_config| {
                dialed_flag.store(true, Ordering::SeqCst);
                NoopConnector
            })
            .await;

        tokio_test::assert_ok!(result);
        assert!(!dialed.load(Ordering::SeqCst), "no upstream dial expected");
        assert!(recorder.closed.load(Ordering::SeqCst));
        let sent = recorder.sent.lock().unwrap().clone();
        assert_eq!(sent, vec![ClientEnvelope::error(MISSING_CREDENTIAL_ERROR)]);
    }

    #[tokio::test]
    async fn test_configured_credential_reaches_the_connector() {
        let manager = SessionManager::new(SessionConfig {
            api_key: Some("test-key".to_string()),
            model: "models/gemini-2.5-flash".to_string(),
        });
        let recorder = RecordingSender::default();
        let seen = Arc::new(Mutex::new(None));

        let seen_config = seen.clone();
        let result = manager
            .run_with(IdleClient, recorder.clone(), move |config| {
                *seen_config.lock().unwrap() = Some(config);
                NoopConnector
            })
            .await;

        tokio_test::assert_ok!(result);
        let config = seen.lock().unwrap().clone().unwrap();
        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.model, "models/gemini-2.5-flash");
        // A normal session sends no error frames.
        assert!(recorder.sent.lock().unwrap().is_empty());
        assert!(recorder.closed.load(Ordering::SeqCst));
    }
}

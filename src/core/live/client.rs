//! Gemini Live WebSocket session client.
//!
//! Connects to the Live API over TLS, performs the one-time setup
//! handshake, and splits into independently owned send and event halves so
//! the two relay pumps can run without sharing or locking the socket.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::WebSocketConfig;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async_with_config};
use tracing::{debug, info, warn};

use super::config::{LiveConfig, MAX_UPSTREAM_FRAME_SIZE};
use super::messages::{InputFrame, SetupFrame};
use crate::session::{UpstreamConnector, UpstreamError, UpstreamEvents, UpstreamSink};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;

/// An established Gemini Live session, setup frame already sent.
pub struct GeminiLiveSession {
    write: WsSink,
    read: WsSource,
}

impl GeminiLiveSession {
    /// Dial the Live endpoint and perform the setup handshake.
    pub async fn connect(config: &LiveConfig) -> Result<Self, UpstreamError> {
        let ws_config = WebSocketConfig::default()
            .max_message_size(Some(MAX_UPSTREAM_FRAME_SIZE))
            .max_frame_size(Some(MAX_UPSTREAM_FRAME_SIZE));

        let (stream, _response) = connect_async_with_config(config.ws_url(), Some(ws_config), false)
            .await
            .map_err(|e| UpstreamError::ConnectionFailed(e.to_string()))?;
        info!(model = %config.model, "connected to Gemini Live");

        let (mut write, read) = stream.split();

        let setup = serde_json::to_string(&SetupFrame::new(config))
            .map_err(|e| UpstreamError::Serialization(e.to_string()))?;
        write
            .send(Message::Text(setup.into()))
            .await
            .map_err(|e| UpstreamError::ConnectionFailed(e.to_string()))?;
        debug!("setup frame sent");

        Ok(Self { write, read })
    }

    /// Split into the single-writer send half and single-reader event half.
    pub fn split(self) -> (GeminiSender, GeminiEvents) {
        (
            GeminiSender {
                write: self.write,
                closed: false,
            },
            GeminiEvents { read: self.read },
        )
    }
}

/// Write half of a Live session.
pub struct GeminiSender {
    write: WsSink,
    closed: bool,
}

impl GeminiSender {
    async fn send_frame(&mut self, frame: &InputFrame) -> Result<(), UpstreamError> {
        let json = serde_json::to_string(frame)
            .map_err(|e| UpstreamError::Serialization(e.to_string()))?;
        self.write
            .send(Message::Text(json.into()))
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))
    }
}

#[async_trait]
impl UpstreamSink for GeminiSender {
    async fn send_text(&mut self, text: &str) -> Result<(), UpstreamError> {
        self.send_frame(&InputFrame::text(text)).await
    }

    async fn send_audio(&mut self, pcm16: Bytes) -> Result<(), UpstreamError> {
        self.send_frame(&InputFrame::audio(&pcm16)).await
    }

    async fn send_video(&mut self, jpeg: Bytes) -> Result<(), UpstreamError> {
        self.send_frame(&InputFrame::video(&jpeg)).await
    }

    async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        // The peer may already be gone; a failed close frame is not an error.
        if let Err(err) = self.write.send(Message::Close(None)).await {
            debug!(error = %err, "upstream close frame not delivered");
        }
    }
}

/// Read half of a Live session.
pub struct GeminiEvents {
    read: WsSource,
}

#[async_trait]
impl UpstreamEvents for GeminiEvents {
    async fn next_event(&mut self) -> Result<Option<Value>, UpstreamError> {
        while let Some(message) = self.read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    return serde_json::from_str(&text)
                        .map(Some)
                        .map_err(|e| UpstreamError::Serialization(e.to_string()));
                }
                Ok(Message::Binary(_)) => {
                    warn!("ignoring unexpected binary frame from Gemini Live");
                }
                Ok(Message::Close(_)) => {
                    info!("Gemini Live closed the session");
                    return Ok(None);
                }
                // Ping/pong are answered by tungstenite itself.
                Ok(_) => {}
                Err(err) => return Err(UpstreamError::Transport(err.to_string())),
            }
        }
        Ok(None)
    }
}

/// [`UpstreamConnector`] for the real Live endpoint.
pub struct GeminiConnector {
    config: LiveConfig,
}

impl GeminiConnector {
    pub fn new(config: LiveConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl UpstreamConnector for GeminiConnector {
    type Sink = GeminiSender;
    type Events = GeminiEvents;

    async fn connect(self) -> Result<(GeminiSender, GeminiEvents), UpstreamError> {
        let session = GeminiLiveSession::connect(&self.config).await?;
        Ok(session.split())
    }
}

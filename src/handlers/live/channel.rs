//! axum WebSocket adapters for the session seams.
//!
//! Splits the accepted socket into a receiver that decodes the client
//! protocol and a sender that writes envelopes, so the relay owns each
//! half independently.

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tracing::debug;

use super::messages::LiveIncomingMessage;
use crate::session::{
    ChannelError, ClientEnvelope, ClientReceiver, ClientSender, InboundClientEvent,
};

/// Split a client socket into the relay's two halves.
pub fn split_client_socket(socket: WebSocket) -> (WsClientReceiver, WsClientSender) {
    let (sender, receiver) = socket.split();
    (
        WsClientReceiver { receiver },
        WsClientSender {
            sender,
            closed: false,
        },
    )
}

/// Read half of the client socket.
pub struct WsClientReceiver {
    receiver: SplitStream<WebSocket>,
}

#[async_trait]
impl ClientReceiver for WsClientReceiver {
    async fn next_request(&mut self) -> Result<Option<InboundClientEvent>, ChannelError> {
        while let Some(message) = self.receiver.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let parsed: LiveIncomingMessage = serde_json::from_str(&text)
                        .map_err(|e| ChannelError::MalformedFrame(e.to_string()))?;
                    return InboundClientEvent::try_from(parsed).map(Some);
                }
                Ok(Message::Binary(_)) => {
                    debug!("ignoring binary client frame");
                }
                Ok(Message::Close(_)) => return Ok(None),
                // Ping/pong are answered by axum.
                Ok(_) => {}
                Err(err) => return Err(ChannelError::Transport(err.to_string())),
            }
        }
        Ok(None)
    }
}

/// Write half of the client socket.
pub struct WsClientSender {
    sender: SplitSink<WebSocket, Message>,
    closed: bool,
}

#[async_trait]
impl ClientSender for WsClientSender {
    async fn send(&mut self, envelope: &ClientEnvelope) -> Result<(), ChannelError> {
        let json = serde_json::to_string(envelope)
            .map_err(|e| ChannelError::Transport(e.to_string()))?;
        self.sender
            .send(Message::Text(json.into()))
            .await
            .map_err(|e| ChannelError::Transport(e.to_string()))
    }

    async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(err) = self.sender.send(Message::Close(None)).await {
            debug!(error = %err, "client close frame not delivered");
        }
    }
}

//! The duplex session relay.
//!
//! One relay runs per accepted client connection. It dials the upstream
//! session, then spawns two pumps: inbound (client requests to the upstream
//! sink) and outbound (upstream events to the client, wrapped in
//! [`ClientEnvelope::gemini`]). When either pump finishes, the relay cancels
//! the sibling, reclaims both write halves, and closes them — the upstream
//! sink exactly once, relying on its idempotent `close`.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use super::base::{
    ClientEnvelope, ClientReceiver, ClientSender, InboundClientEvent, RelayError, RelayState,
    UpstreamConnector, UpstreamEvents, UpstreamSink,
};

/// Relays events between one client connection and one upstream session.
pub struct SessionRelay<Rx, Tx> {
    client_rx: Rx,
    client_tx: Tx,
    state: RelayState,
}

impl<Rx, Tx> SessionRelay<Rx, Tx>
where
    Rx: ClientReceiver,
    Tx: ClientSender,
{
    pub fn new(client_rx: Rx, client_tx: Tx) -> Self {
        Self {
            client_rx,
            client_tx,
            state: RelayState::Idle,
        }
    }

    /// Drive the session to completion.
    ///
    /// Consumes the relay: a relay is single-shot and never reconnects.
    /// Returns the error of whichever pump failed first, if any; a clean
    /// disconnect on either side is `Ok(())`.
    pub async fn run<C>(mut self, connector: C) -> Result<(), RelayError>
    where
        C: UpstreamConnector,
    {
        self.state = RelayState::Connecting;
        debug!(state = %self.state, "dialing upstream session");

        let (sink, events) = match connector.connect().await {
            Ok(halves) => halves,
            Err(err) => {
                // The client has received nothing yet; close it without a
                // gemini envelope and surface the failure to the caller.
                self.state = RelayState::Closed;
                warn!(state = %self.state, error = %err, "upstream connect failed");
                self.client_tx.close().await;
                return Err(err.into());
            }
        };

        self.state = RelayState::Active;
        debug!(state = %self.state, "relay pumps starting");

        let cancel = CancellationToken::new();
        let mut inbound = tokio::spawn(pump_inbound(self.client_rx, sink, cancel.clone()));
        let mut outbound = tokio::spawn(pump_outbound(events, self.client_tx, cancel.clone()));

        // Race the pumps: whichever finishes first wins, the sibling is
        // cancelled and awaited so both halves come back for teardown.
        let (inbound_half, outbound_half, inbound_first) = tokio::select! {
            joined = &mut inbound => {
                cancel.cancel();
                (flatten_join(joined), join_pump(outbound).await, true)
            }
            joined = &mut outbound => {
                cancel.cancel();
                (join_pump(inbound).await, flatten_join(joined), false)
            }
        };

        self.state = RelayState::Closing;
        debug!(state = %self.state, "tearing down session");

        let mut inbound_result = Ok(());
        let mut outbound_result = Ok(());

        if let Some((mut sink, result)) = inbound_half {
            sink.close().await;
            inbound_result = result;
        }
        if let Some((mut client_tx, result)) = outbound_half {
            client_tx.close().await;
            outbound_result = result;
        }

        self.state = RelayState::Closed;
        debug!(state = %self.state, "relay finished");

        // Report the error of the pump that terminated first.
        if inbound_first {
            inbound_result.and(outbound_result)
        } else {
            outbound_result.and(inbound_result)
        }
    }
}

type PumpOutput<T> = (T, Result<(), RelayError>);

/// Await a cancelled pump and recover its half.
async fn join_pump<T>(handle: JoinHandle<PumpOutput<T>>) -> Option<PumpOutput<T>> {
    flatten_join(handle.await)
}

fn flatten_join<T>(
    joined: Result<PumpOutput<T>, tokio::task::JoinError>,
) -> Option<PumpOutput<T>> {
    match joined {
        Ok(output) => Some(output),
        Err(err) => {
            error!(error = %err, "relay pump task failed to join");
            None
        }
    }
}

/// Inbound pump: client requests to the upstream sink.
///
/// Ends normally on client disconnect or cancellation; a channel or
/// upstream error ends it with that error. Returns the sink either way so
/// the relay can close it.
async fn pump_inbound<Rx, S>(
    mut client_rx: Rx,
    mut sink: S,
    cancel: CancellationToken,
) -> PumpOutput<S>
where
    Rx: ClientReceiver,
    S: UpstreamSink,
{
    let result = loop {
        let request = tokio::select! {
            _ = cancel.cancelled() => {
                debug!("inbound pump cancelled");
                break Ok(());
            }
            request = client_rx.next_request() => request,
        };

        match request {
            Ok(Some(InboundClientEvent::Text(text))) => {
                if let Err(err) = sink.send_text(&text).await {
                    break Err(err.into());
                }
            }
            Ok(Some(InboundClientEvent::Audio(pcm16))) => {
                if let Err(err) = sink.send_audio(pcm16).await {
                    break Err(err.into());
                }
            }
            Ok(None) => {
                debug!("client disconnected, inbound pump finished");
                break Ok(());
            }
            Err(err) => break Err(err.into()),
        }
    };
    (sink, result)
}

/// Outbound pump: upstream events to the client.
///
/// Send failures are swallowed — the client is already gone and the
/// resulting teardown is the same. Upstream end-of-stream or error
/// terminates the pump. Returns the client sender for teardown.
async fn pump_outbound<E, Tx>(
    mut events: E,
    mut client_tx: Tx,
    cancel: CancellationToken,
) -> PumpOutput<Tx>
where
    E: UpstreamEvents,
    Tx: ClientSender,
{
    let result = loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => {
                debug!("outbound pump cancelled");
                break Ok(());
            }
            event = events.next_event() => event,
        };

        match event {
            Ok(Some(data)) => {
                let envelope = ClientEnvelope::gemini(data);
                if let Err(err) = client_tx.send(&envelope).await {
                    debug!(error = %err, "client unreachable, outbound pump finished");
                    break Ok(());
                }
            }
            Ok(None) => {
                debug!("upstream closed, outbound pump finished");
                break Ok(());
            }
            Err(err) => break Err(err.into()),
        }
    };
    (client_tx, result)
}

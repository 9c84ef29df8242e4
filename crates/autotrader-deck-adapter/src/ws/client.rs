/*
[INPUT]:  Push-channel WebSocket URL
[OUTPUT]: Parsed push messages via mpsc + connection health via watch
[POS]:    WebSocket layer - live update stream handling
[UPDATE]: When changing connection lifecycle or message sampling
*/

use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Mutex, mpsc, watch};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, info, warn};

use crate::http::{DeckError, Result};
use crate::ws::message::PushMessage;

/// Default push endpoint of a locally running backend
pub const DEFAULT_PUSH_URL: &str = "ws://localhost:8000/ws/trader";
const MESSAGE_SAMPLE_LIMIT: usize = 3;
const OTHER_LOG_LIMIT: usize = 3;
const PARSE_FAIL_LOG_LIMIT: usize = 3;
const RAW_LOG_MAX_BYTES: usize = 1024;

static MESSAGE_SAMPLE_COUNT: AtomicUsize = AtomicUsize::new(0);
static OTHER_LOG_COUNT: AtomicUsize = AtomicUsize::new(0);
static PARSE_FAIL_LOG_COUNT: AtomicUsize = AtomicUsize::new(0);

/// Health of the push connection, surfaced to the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Connected,
    Disconnected,
}

impl ConnectionState {
    pub fn is_connected(self) -> bool {
        matches!(self, ConnectionState::Connected)
    }
}

/// Client for the backend's push channel.
///
/// Connects once; a dropped connection is reported through
/// [`ConnectionState::Disconnected`] and is not re-established here.
#[derive(Debug)]
pub struct PushChannel {
    message_tx: mpsc::Sender<PushMessage>,
    message_rx: Option<mpsc::Receiver<PushMessage>>,
    outbound_tx: Arc<Mutex<Option<mpsc::Sender<WsMessage>>>>,
    connection_state: watch::Sender<ConnectionState>,
}

impl PushChannel {
    /// Create a new, unconnected push client
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(100);
        let (connection_state, _rx) = watch::channel(ConnectionState::Disconnected);
        Self {
            message_tx: tx,
            message_rx: Some(rx),
            outbound_tx: Arc::new(Mutex::new(None)),
            connection_state,
        }
    }

    /// Get the message receiver
    pub fn take_receiver(&mut self) -> Option<mpsc::Receiver<PushMessage>> {
        self.message_rx.take()
    }

    /// Subscribe to connection health changes
    pub fn subscribe_connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.connection_state.subscribe()
    }

    pub fn connection_state(&self) -> ConnectionState {
        *self.connection_state.borrow()
    }

    /// Connect and start forwarding parsed messages to the receiver
    pub async fn connect(&self, url: &str) -> Result<()> {
        {
            let guard = self.outbound_tx.lock().await;
            if guard.is_some() {
                return Err(DeckError::WebSocket("push channel already connected".to_string()));
            }
        }

        let _ = self.connection_state.send(ConnectionState::Connecting);
        let ws_stream = match connect_async(url).await {
            Ok((ws_stream, _response)) => ws_stream,
            Err(err) => {
                let _ = self.connection_state.send(ConnectionState::Disconnected);
                return Err(DeckError::WebSocket(err.to_string()));
            }
        };
        let (mut write, mut read) = ws_stream.split();
        let (outbound_tx, mut outbound_rx) = mpsc::channel(16);
        let outbound_state = self.outbound_tx.clone();

        {
            let mut guard = outbound_state.lock().await;
            *guard = Some(outbound_tx);
        }

        let _ = self.connection_state.send(ConnectionState::Connected);
        info!(url, "push channel connected");

        let message_tx = self.message_tx.clone();
        let connection_state = self.connection_state.clone();
        let outbound_state_for_task = outbound_state.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    outbound = outbound_rx.recv() => {
                        match outbound {
                            Some(message) => {
                                if write.send(message).await.is_err() {
                                    break;
                                }
                            }
                            None => {
                                let _ = write.send(WsMessage::Close(None)).await;
                                break;
                            }
                        }
                    }
                    incoming = read.next() => {
                        match incoming {
                            Some(Ok(WsMessage::Close(_))) => {
                                let _ = write.send(WsMessage::Close(None)).await;
                                break;
                            }
                            Some(Ok(WsMessage::Ping(_))) | Some(Ok(WsMessage::Pong(_))) => {}
                            Some(Ok(message)) => {
                                if let Some(parsed) = Self::parse_message(message)
                                    && message_tx.send(parsed).await.is_err()
                                {
                                    break;
                                }
                            }
                            Some(Err(err)) => {
                                warn!(error = %err, "push channel read failed");
                                break;
                            }
                            None => break,
                        }
                    }
                }
            }

            let mut guard = outbound_state_for_task.lock().await;
            *guard = None;
            let _ = connection_state.send(ConnectionState::Disconnected);
            info!("push channel disconnected");
        });

        Ok(())
    }

    /// Close the connection; the reader task reports `Disconnected` when done
    pub async fn close(&self) {
        let mut guard = self.outbound_tx.lock().await;
        guard.take();
    }

    fn parse_message(message: WsMessage) -> Option<PushMessage> {
        let text: String = match message {
            WsMessage::Text(text) => text.to_string(),
            WsMessage::Binary(bytes) => String::from_utf8(bytes.to_vec()).ok()?,
            _ => return None,
        };

        match serde_json::from_str::<PushMessage>(&text) {
            Ok(parsed) => {
                if matches!(parsed, PushMessage::Other) {
                    log_other_message_once(&text);
                    None
                } else {
                    log_message_sample_once(&parsed);
                    Some(parsed)
                }
            }
            Err(err) => {
                log_parse_fail_once(&err, &text);
                None
            }
        }
    }
}

impl Default for PushChannel {
    fn default() -> Self {
        Self::new()
    }
}

fn log_message_sample_once(message: &PushMessage) {
    let count = MESSAGE_SAMPLE_COUNT.fetch_add(1, Ordering::Relaxed);
    if count >= MESSAGE_SAMPLE_LIMIT {
        return;
    }

    let payload = message.payload();
    info!(
        sample_index = count + 1,
        sample_limit = MESSAGE_SAMPLE_LIMIT,
        kind = message.kind(),
        performance = payload.is_some_and(|p| p.performance.is_some()),
        status = payload.is_some_and(|p| p.status.is_some()),
        positions = payload.is_some_and(|p| p.positions.is_some()),
        logs = payload.is_some_and(|p| p.logs.is_some()),
        "push message sample"
    );
}

fn log_other_message_once(raw: &str) {
    let count = OTHER_LOG_COUNT.fetch_add(1, Ordering::Relaxed);
    if count < OTHER_LOG_LIMIT {
        info!(
            sample_index = count + 1,
            sample_limit = OTHER_LOG_LIMIT,
            bytes = raw.len(),
            "push message type unrecognized"
        );
        let preview = truncate_for_log(raw, RAW_LOG_MAX_BYTES);
        debug!(
            sample_index = count + 1,
            sample_limit = OTHER_LOG_LIMIT,
            bytes = raw.len(),
            message = %preview,
            "push message type unrecognized"
        );
    }
}

fn log_parse_fail_once(err: &serde_json::Error, raw: &str) {
    let count = PARSE_FAIL_LOG_COUNT.fetch_add(1, Ordering::Relaxed);
    if count < PARSE_FAIL_LOG_LIMIT {
        info!(
            sample_index = count + 1,
            sample_limit = PARSE_FAIL_LOG_LIMIT,
            error = %err,
            bytes = raw.len(),
            "push message parse failed"
        );
        let preview = truncate_for_log(raw, RAW_LOG_MAX_BYTES);
        debug!(
            sample_index = count + 1,
            sample_limit = PARSE_FAIL_LOG_LIMIT,
            error = %err,
            bytes = raw.len(),
            message = %preview,
            "push message parse failed"
        );
    }
}

fn truncate_for_log(value: &str, max_len: usize) -> String {
    if value.len() <= max_len {
        return value.to_string();
    }
    let mut end = max_len;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    let mut out = String::with_capacity(end + 3);
    out.push_str(&value[..end]);
    out.push_str("...");
    out
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket fan-out server (spec.md §4.D). One task per connection, an
//! `mpsc` channel feeding that connection's write half, `tokio-tungstenite`
//! text frames of line-delimited JSON.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use fmdm_core::{ClientSession, ClientType, Fmdm};
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::handlers::{self, Dispatched, HandlerContext};
use crate::protocol::{self, ModelDownloadData, Request, Response};
use crate::store::{ModelDownloadEvent, Store};
use crate::throttler::Throttler;

type Outbox = mpsc::UnboundedSender<WsMessage>;

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("websocket handshake failed: {0}")]
    Handshake(#[from] tokio_tungstenite::tungstenite::Error),
}

struct SessionState {
    kind: ClientType,
    initialized: bool,
    connected_at: DateTime<Utc>,
}

struct Sessions {
    outboxes: Mutex<HashMap<Uuid, Outbox>>,
    meta: Mutex<HashMap<Uuid, SessionState>>,
}

impl Sessions {
    fn new() -> Self {
        Self { outboxes: Mutex::new(HashMap::new()), meta: Mutex::new(HashMap::new()) }
    }

    fn snapshot_clients(&self) -> Vec<ClientSession> {
        self.meta
            .lock()
            .iter()
            .map(|(id, state)| ClientSession { id: *id, kind: state.kind, connected_at: state.connected_at, initialized: state.initialized })
            .collect()
    }
}

/// Binds a loopback-only listener and fans out FMDM updates to every
/// initialized session, through the [`Throttler`].
pub struct Server {
    store: Store,
    ctx: Arc<HandlerContext>,
    sessions: Arc<Sessions>,
}

impl Server {
    pub fn new(store: Store, ctx: Arc<HandlerContext>, throttler: Arc<Throttler>) -> Self {
        let sessions = Arc::new(Sessions::new());
        let broadcast_sessions = Arc::clone(&sessions);
        store.subscribe(move |snapshot| {
            let sessions = Arc::clone(&broadcast_sessions);
            throttler.request_broadcast(move || broadcast_fmdm(&sessions, &snapshot));
        });

        // Discrete model-download events (spec.md §6) are sent immediately,
        // not through the throttler: they are already rate-limited by the
        // download manager's own tick cadence.
        let download_event_sessions = Arc::clone(&sessions);
        store.subscribe_model_download_events(move |model_id, event| {
            broadcast_model_download_event(&download_event_sessions, model_id, event);
        });

        Self { store, ctx, sessions }
    }

    pub async fn start(&self, host: &str, port: u16) -> std::io::Result<()> {
        let addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("invalid listen address: {e}")))?;
        let listener = TcpListener::bind(addr).await?;
        info!(%addr, "websocket fan-out server listening");

        loop {
            let (stream, peer) = listener.accept().await?;
            let store = self.store.clone();
            let ctx = Arc::clone(&self.ctx);
            let sessions = Arc::clone(&self.sessions);
            tokio::spawn(async move {
                if let Err(err) = handle_connection(stream, peer, store, ctx, sessions).await {
                    warn!(%peer, %err, "connection ended with error");
                }
            });
        }
    }
}

async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    store: Store,
    ctx: Arc<HandlerContext>,
    sessions: Arc<Sessions>,
) -> Result<(), ConnectionError> {
    let ws = tokio_tungstenite::accept_async(stream).await?;
    let (mut write, mut read) = ws.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<WsMessage>();
    let client_id = Uuid::new_v4();

    sessions.outboxes.lock().insert(client_id, tx.clone());
    sessions.meta.lock().insert(client_id, SessionState { kind: ClientType::Unknown, initialized: false, connected_at: Utc::now() });
    publish_clients(&store, &sessions);
    debug!(%peer, %client_id, "client connected");

    let writer_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if write.send(msg).await.is_err() {
                break;
            }
        }
    });

    while let Some(frame) = read.next().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(err) => {
                debug!(%peer, %err, "transport error, closing session");
                break;
            }
        };
        let text = match frame {
            WsMessage::Text(text) => text.to_string(),
            WsMessage::Close(_) => break,
            _ => continue,
        };

        let request: Request = match protocol::decode(&text) {
            Ok(request) => request,
            Err(err) => {
                send(&tx, &Response::error(err.to_string(), Some("malformed_json")));
                continue;
            }
        };

        let missing_id = request.correlation_id().map(str::is_empty).unwrap_or(true);
        if request.requires_correlation_id() && missing_id {
            send(&tx, &Response::error("request requires a non-empty correlation id", Some("missing_id")));
            continue;
        }

        dispatch_and_reply(&ctx, &store, &sessions, client_id, &tx, request);
    }

    writer_task.abort();
    sessions.outboxes.lock().remove(&client_id);
    sessions.meta.lock().remove(&client_id);
    publish_clients(&store, &sessions);
    debug!(%peer, %client_id, "client disconnected");
    Ok(())
}

fn dispatch_and_reply(
    ctx: &Arc<HandlerContext>,
    store: &Store,
    sessions: &Arc<Sessions>,
    client_id: Uuid,
    tx: &Outbox,
    request: Request,
) {
    match handlers::dispatch(ctx, request) {
        Dispatched::ConnectionInit { client_type } => {
            if let Some(state) = sessions.meta.lock().get_mut(&client_id) {
                state.kind = client_type;
                state.initialized = true;
            }
            publish_clients(store, sessions);
            send(tx, &Response::ConnectionAck { client_id: client_id.to_string() });

            // Scheduled on the next tick so the peer has a chance to
            // register its receive handler before the snapshot arrives
            // (spec.md §4.D session lifecycle).
            let snapshot = store.snapshot();
            let tx = tx.clone();
            tokio::spawn(async move {
                tokio::task::yield_now().await;
                send(&tx, &Response::FmdmUpdate { fmdm: snapshot });
            });
        }
        Dispatched::Responses(responses) => {
            for response in responses {
                send(tx, &response);
            }
        }
    }
}

fn send(tx: &Outbox, response: &Response) {
    match protocol::encode(response) {
        Ok(text) => {
            let _ = tx.send(WsMessage::Text(text.into()));
        }
        Err(err) => warn!(%err, "failed to encode outgoing response"),
    }
}

fn publish_clients(store: &Store, sessions: &Sessions) {
    store.update_clients(sessions.snapshot_clients());
}

/// Skips sessions that are not yet `initialized`, matching spec.md §8's
/// invariant that no message precedes a client's `connection.ack`.
fn broadcast_fmdm(sessions: &Sessions, snapshot: &Arc<Fmdm>) {
    let frame = match protocol::encode(&Response::FmdmUpdate { fmdm: Arc::clone(snapshot) }) {
        Ok(text) => text,
        Err(err) => {
            warn!(%err, "failed to encode fmdm snapshot");
            return;
        }
    };

    let outboxes = sessions.outboxes.lock();
    let meta = sessions.meta.lock();
    for (id, tx) in outboxes.iter() {
        let initialized = meta.get(id).map(|s| s.initialized).unwrap_or(false);
        if !initialized {
            continue;
        }
        if tx.send(WsMessage::Text(frame.clone().into())).is_err() {
            debug!(client_id = %id, "dropping broadcast to a closed session");
        }
    }
}

/// Translates a [`ModelDownloadEvent`] into its wire response (spec.md §6
/// `model_download_start/_progress/_complete/_error`) and fans it out
/// alongside the `fmdm.update` the same event already produced.
fn broadcast_model_download_event(sessions: &Sessions, model_id: &str, event: &ModelDownloadEvent) {
    let response = match event {
        ModelDownloadEvent::Started => Response::ModelDownloadStart {
            data: ModelDownloadData { model_name: model_id.to_string(), progress: Some(fmdm_backends::START_PCT), error: None },
        },
        ModelDownloadEvent::Progress(pct) => Response::ModelDownloadProgress {
            data: ModelDownloadData { model_name: model_id.to_string(), progress: Some(*pct), error: None },
        },
        ModelDownloadEvent::Completed => Response::ModelDownloadComplete {
            data: ModelDownloadData { model_name: model_id.to_string(), progress: Some(100), error: None },
        },
        ModelDownloadEvent::Failed(message) => Response::ModelDownloadError {
            data: ModelDownloadData { model_name: model_id.to_string(), progress: None, error: Some(message.clone()) },
        },
    };

    let frame = match protocol::encode(&response) {
        Ok(text) => text,
        Err(err) => {
            warn!(%err, "failed to encode model-download event");
            return;
        }
    };

    let outboxes = sessions.outboxes.lock();
    let meta = sessions.meta.lock();
    for (id, tx) in outboxes.iter() {
        let initialized = meta.get(id).map(|s| s.initialized).unwrap_or(false);
        if !initialized {
            continue;
        }
        if tx.send(WsMessage::Text(frame.clone().into())).is_err() {
            debug!(client_id = %id, "dropping broadcast to a closed session");
        }
    }
}

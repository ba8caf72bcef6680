//! # REST + WebSocket API
//!
//! Builds the axum router that exposes the node's HTTP interface. All
//! endpoints share application state through axum's `State` extractor.
//!
//! ## Endpoints
//!
//! | Method | Path              | Description                          |
//! |--------|-------------------|--------------------------------------|
//! | GET    | `/health`         | Liveness probe                       |
//! | GET    | `/status`         | Node status summary                  |
//! | GET    | `/blocks/:index`  | Block by index                       |
//! | GET    | `/ws`             | WebSocket for actions + live blocks  |
//!
//! ## WebSocket protocol
//!
//! Clients send `{"action": "<NAME>"}` and receive
//! `{"status": "Success" | "Error", "payload": {...}}`, where the payload
//! always lists the available actions. Independently of request/response
//! traffic, every connected socket receives a `new_block` event for each
//! block appended to the hosted chain.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use strata_ledger::perf::Instrumented;
use strata_ledger::wallet::Wallet;
use strata_ledger::{Block, Blockchain};

use crate::metrics::SharedMetrics;

/// Actions a WebSocket client may request, echoed in every payload.
pub const ACTIONS: [&str; 3] = ["NEW_BLOCKCHAIN", "MINE_BLOCK", "VALIDATE_CHAIN"];

// ---------------------------------------------------------------------------
// Application State
// ---------------------------------------------------------------------------

/// Shared application state available to all request handlers.
///
/// Cheap to clone — everything behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// The node's reported version string.
    pub version: String,
    /// The hosted chain, behind the latency-instrumentation wrapper.
    /// `NEW_BLOCKCHAIN` swaps the whole value for a fresh one.
    pub ledger: Arc<RwLock<Instrumented<Blockchain>>>,
    /// Wallet that mining rewards are addressed to.
    pub miner: Arc<Wallet>,
    /// Broadcast channel for live block notifications to every socket.
    pub event_tx: broadcast::Sender<NodeEvent>,
    /// Reference to Prometheus metrics for in-handler recording.
    pub metrics: SharedMetrics,
}

impl AppState {
    /// Builds the state for a freshly started node: a genesis-only chain
    /// and the given miner wallet.
    pub fn new(miner: Wallet, metrics: SharedMetrics, event_capacity: usize) -> Self {
        let (event_tx, _) = broadcast::channel(event_capacity);
        metrics.chain_height.set(1);
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            ledger: Arc::new(RwLock::new(Instrumented::new(Blockchain::new()))),
            miner: Arc::new(miner),
            event_tx,
            metrics,
        }
    }
}

/// Events pushed to WebSocket subscribers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeEvent {
    /// A new block was appended to the hosted chain.
    #[serde(rename = "new_block")]
    NewBlock {
        index: u64,
        hash: String,
        previous_hash: String,
        tx_count: u64,
        timestamp_ms: i64,
    },
}

// ---------------------------------------------------------------------------
// Router Construction
// ---------------------------------------------------------------------------

/// Builds the full axum [`Router`] with all API routes, CORS, and tracing.
///
/// The returned router is ready to be served on the configured RPC port.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/status", get(status_handler))
        .route("/blocks/:index", get(block_by_index_handler))
        .route("/ws", get(ws_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Wire Types
// ---------------------------------------------------------------------------

/// A WebSocket action request.
#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    /// The action to perform. One of [`ACTIONS`].
    pub action: String,
}

/// Outcome marker on every action response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseStatus {
    Success,
    Error,
}

/// A WebSocket action response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ActionResponse {
    /// `Success` or `Error`.
    pub status: ResponseStatus,
    /// Action-specific payload; always carries an `actions` list.
    pub payload: serde_json::Value,
}

/// A block as rendered on the wire, hash included.
#[derive(Debug, Serialize, Deserialize)]
pub struct BlockView {
    /// Position in the chain (genesis = 1).
    pub index: u64,
    /// Creation time in Unix milliseconds.
    pub timestamp_ms: i64,
    /// Hash of the preceding block.
    pub previous_hash: String,
    /// The block's own hash, derived at render time.
    pub hash: String,
    /// Number of transactions carried.
    pub tx_count: u64,
}

impl BlockView {
    fn from_block(block: &Block) -> Self {
        Self {
            index: block.index,
            timestamp_ms: block.timestamp_ms,
            previous_hash: block.previous_hash.clone(),
            hash: block.hash(),
            tx_count: block.transactions.len() as u64,
        }
    }
}

/// Response payload for `GET /status`.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Node software version.
    pub version: String,
    /// Current chain height.
    pub height: usize,
    /// Hash of the chain tip.
    pub top_hash: String,
    /// ISO-8601 timestamp of the response.
    pub timestamp: String,
}

/// Generic error body returned by REST endpoints on failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ---------------------------------------------------------------------------
// Action Processing
// ---------------------------------------------------------------------------

/// Executes one client action against the hosted chain and produces the
/// response envelope. Factored out of the socket loop so the protocol is
/// testable without a live connection.
pub async fn process_action(state: &AppState, action: &str) -> ActionResponse {
    match action {
        "NEW_BLOCKCHAIN" => {
            let mut ledger = state.ledger.write().await;
            *ledger = Instrumented::new(Blockchain::new());
            state.metrics.chain_height.set(1);
            tracing::info!("chain replaced with a fresh genesis");
            ActionResponse {
                status: ResponseStatus::Success,
                payload: serde_json::json!({
                    "message": "New blockchain created",
                    "height": ledger.height(),
                    "actions": ACTIONS,
                }),
            }
        }
        "MINE_BLOCK" => {
            let mut ledger = state.ledger.write().await;
            let reward = state.miner.reward_transaction();
            let block = match Block::new(
                ledger.top().index + 1,
                ledger.top().hash(),
                vec![reward],
            ) {
                Ok(block) => block,
                Err(e) => {
                    return ActionResponse {
                        status: ResponseStatus::Error,
                        payload: serde_json::json!({
                            "reason": e.to_string(),
                            "actions": ACTIONS,
                        }),
                    }
                }
            };

            let appended = ledger.push(block);
            let view = BlockView::from_block(appended);
            let height = ledger.height();

            state.metrics.blocks_appended_total.inc();
            state.metrics.chain_height.set(height as i64);

            let _ = state.event_tx.send(NodeEvent::NewBlock {
                index: view.index,
                hash: view.hash.clone(),
                previous_hash: view.previous_hash.clone(),
                tx_count: view.tx_count,
                timestamp_ms: view.timestamp_ms,
            });
            tracing::info!(index = view.index, hash = %view.hash, "block mined");

            ActionResponse {
                status: ResponseStatus::Success,
                payload: serde_json::json!({
                    "block": view,
                    "height": height,
                    "actions": ACTIONS,
                }),
            }
        }
        "VALIDATE_CHAIN" => {
            let ledger = state.ledger.read().await;
            let outcome = ledger.validate();

            state.metrics.validations_total.inc();
            if let Some(sample) = ledger.samples().last() {
                state
                    .metrics
                    .validate_latency_seconds
                    .observe(sample.as_secs_f64());
            }

            if outcome.is_success() {
                ActionResponse {
                    status: ResponseStatus::Success,
                    payload: serde_json::json!({
                        "message": outcome.to_string(),
                        "height": ledger.height(),
                        "actions": ACTIONS,
                    }),
                }
            } else {
                state.metrics.validation_failures_total.inc();
                tracing::warn!(outcome = %outcome, "chain failed validation");
                ActionResponse {
                    status: ResponseStatus::Error,
                    payload: serde_json::json!({
                        "reason": outcome.to_string(),
                        "actions": ACTIONS,
                    }),
                }
            }
        }
        other => ActionResponse {
            status: ResponseStatus::Error,
            payload: serde_json::json!({
                "message": format!("Unknown action: {other}"),
                "actions": ACTIONS,
            }),
        },
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /health` — returns 200 if the node is alive.
///
/// This is the liveness probe for orchestrators. It intentionally does not
/// inspect the chain — that belongs in `/status`.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

/// `GET /status` — returns a summary of the hosted chain.
async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let ledger = state.ledger.read().await;
    let resp = StatusResponse {
        version: state.version.clone(),
        height: ledger.height(),
        top_hash: ledger.top().hash(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };
    Json(resp)
}

/// `GET /blocks/:index` — returns a block by its 1-based index.
///
/// Returns 404 if the chain has no block at the requested index.
async fn block_by_index_handler(
    Path(index): Path<u64>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let ledger = state.ledger.read().await;
    match ledger.iter().find(|block| block.index == index) {
        Some(block) => {
            (StatusCode::OK, Json(serde_json::json!(BlockView::from_block(block)))).into_response()
        }
        None => {
            let err = ErrorResponse {
                error: format!("Block not found at index {}", index),
            };
            (StatusCode::NOT_FOUND, Json(serde_json::json!(err))).into_response()
        }
    }
}

/// `GET /ws` — WebSocket upgrade for the action protocol plus live block
/// events.
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws_connection(socket, state))
}

/// Drives a single WebSocket connection: answers action requests and
/// forwards broadcast block events until the client disconnects.
async fn handle_ws_connection(mut socket: WebSocket, state: AppState) {
    let mut rx = state.event_tx.subscribe();

    loop {
        tokio::select! {
            event = rx.recv() => {
                match event {
                    Ok(ev) => {
                        let payload = match serde_json::to_string(&ev) {
                            Ok(s) => s,
                            Err(e) => {
                                tracing::warn!("failed to serialize ws event: {}", e);
                                continue;
                            }
                        };
                        if socket.send(Message::Text(payload)).await.is_err() {
                            // Client disconnected.
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!("ws subscriber lagged by {} events", n);
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        break;
                    }
                }
            }
            msg = socket.recv() => {
                let text = match msg {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => continue, // Ping/pong/binary are ignored.
                    Some(Err(_)) => break,
                };

                let response = match serde_json::from_str::<ActionRequest>(&text) {
                    Ok(req) => process_action(&state, &req.action).await,
                    Err(e) => ActionResponse {
                        status: ResponseStatus::Error,
                        payload: serde_json::json!({
                            "message": format!("Malformed request: {e}"),
                            "actions": ACTIONS,
                        }),
                    },
                };

                let body = match serde_json::to_string(&response) {
                    Ok(s) => s,
                    Err(e) => {
                        tracing::warn!("failed to serialize ws response: {}", e);
                        continue;
                    }
                };
                if socket.send(Message::Text(body)).await.is_err() {
                    break;
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

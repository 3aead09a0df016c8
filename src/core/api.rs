//! HTTP + WebSocket monitor for the phase engine
//!
//! Endpoints:
//! - POST /session/new - Create new session
//! - GET /session/{id} - Get engine snapshot
//! - POST /session/{id}/scroll - Feed a scroll event
//! - GET /session/{id}/config - Get active configuration
//! - WS /ws/{id} - Live tick outputs and engine events
//! - GET /health - Health check
//!
//! Each session owns an engine behind a mutex plus a background task ticking
//! it at the configured cadence; ticks and engine events fan out over a
//! broadcast channel to any attached WebSocket.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, Mutex, RwLock};

use crate::core::PhaseEngine;
use crate::types::{
    EngineConfig, EngineEvent, EngineSnapshot, EventSink, LandmarkVisibility, TickOutput,
};

/// One frame on the live update stream
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsFrame {
    Tick(TickOutput),
    Event(EngineEvent),
}

/// Sink that fans engine events out to WebSocket subscribers
struct BroadcastSink {
    tx: broadcast::Sender<WsFrame>,
}

impl EventSink for BroadcastSink {
    fn emit(&self, event: &EngineEvent) {
        let _ = self.tx.send(WsFrame::Event(event.clone()));
    }
}

/// Session state
pub struct Session {
    pub id: String,
    pub engine: Arc<Mutex<PhaseEngine>>,
    pub started: Instant,
    pub update_tx: broadcast::Sender<WsFrame>,
    ticker: tokio::task::JoinHandle<()>,
}

impl Drop for Session {
    fn drop(&mut self) {
        self.ticker.abort();
    }
}

/// App state
pub struct AppState {
    pub sessions: RwLock<HashMap<String, Session>>,
}

/// Create new session request
#[derive(Debug, Default, Deserialize)]
pub struct NewSessionRequest {
    /// Preset name: "thermal" (default) or "fine"
    pub preset: Option<String>,
    /// Initial scrollable extent (px)
    pub extent: Option<f64>,
}

/// Create new session response
#[derive(Debug, Serialize)]
pub struct NewSessionResponse {
    pub session_id: String,
    pub websocket_url: String,
}

/// Session status response
#[derive(Debug, Serialize)]
pub struct SessionStatusResponse {
    pub session_id: String,
    #[serde(flatten)]
    pub snapshot: EngineSnapshot,
    pub landmarks: Vec<LandmarkVisibility>,
}

/// Scroll event request
#[derive(Debug, Deserialize)]
pub struct ScrollRequest {
    pub offset: f64,
    /// New scrollable extent, when the layout changed
    pub extent: Option<f64>,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub sessions_active: usize,
}

/// Create the API router
pub fn create_router() -> Router {
    let state = Arc::new(AppState {
        sessions: RwLock::new(HashMap::new()),
    });

    Router::new()
        .route("/health", get(health))
        .route("/session/new", post(create_session))
        .route("/session/:id", get(get_session))
        .route("/session/:id/scroll", post(post_scroll))
        .route("/session/:id/config", get(get_config))
        .route("/ws/:id", get(websocket_handler))
        .with_state(state)
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let sessions = state.sessions.read().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        sessions_active: sessions.len(),
    })
}

/// Create new session
async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewSessionRequest>,
) -> Result<Json<NewSessionResponse>, StatusCode> {
    let config = match req.preset.as_deref() {
        None => EngineConfig::thermal(),
        Some(name) => EngineConfig::preset(name).ok_or(StatusCode::BAD_REQUEST)?,
    };

    let session_id = generate_session_id();
    let (tx, _) = broadcast::channel(100);

    let mut engine = PhaseEngine::with_sink(
        config.clone(),
        Box::new(BroadcastSink { tx: tx.clone() }),
    );
    if let Some(extent) = req.extent {
        engine.on_resize(extent);
    }
    let engine = Arc::new(Mutex::new(engine));

    let started = Instant::now();
    let ticker = spawn_ticker(
        engine.clone(),
        tx.clone(),
        started,
        config.tick_interval_ms,
    );

    let session = Session {
        id: session_id.clone(),
        engine,
        started,
        update_tx: tx,
        ticker,
    };

    let mut sessions = state.sessions.write().await;
    sessions.insert(session_id.clone(), session);

    Ok(Json(NewSessionResponse {
        session_id: session_id.clone(),
        websocket_url: format!("/ws/{}", session_id),
    }))
}

/// Background evaluation loop for one session
fn spawn_ticker(
    engine: Arc<Mutex<PhaseEngine>>,
    tx: broadcast::Sender<WsFrame>,
    started: Instant,
    tick_interval_ms: f64,
) -> tokio::task::JoinHandle<()> {
    let period = Duration::from_millis(tick_interval_ms.max(1.0) as u64);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            let now_ms = started.elapsed().as_secs_f64() * 1000.0;
            let output = engine.lock().await.tick(now_ms);
            let _ = tx.send(WsFrame::Tick(output));
        }
    })
}

/// Get session snapshot
async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionStatusResponse>, StatusCode> {
    let sessions = state.sessions.read().await;
    let session = sessions.get(&id).ok_or(StatusCode::NOT_FOUND)?;

    let engine = session.engine.lock().await;
    Ok(Json(SessionStatusResponse {
        session_id: session.id.clone(),
        snapshot: engine.snapshot(),
        landmarks: engine.landmarks(),
    }))
}

/// Feed a scroll event into a session
async fn post_scroll(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<ScrollRequest>,
) -> Result<Json<SessionStatusResponse>, StatusCode> {
    let sessions = state.sessions.read().await;
    let session = sessions.get(&id).ok_or(StatusCode::NOT_FOUND)?;

    let now_ms = session.started.elapsed().as_secs_f64() * 1000.0;
    let mut engine = session.engine.lock().await;
    if let Some(extent) = req.extent {
        engine.on_resize(extent);
    }
    engine.on_scroll(req.offset, now_ms);

    Ok(Json(SessionStatusResponse {
        session_id: session.id.clone(),
        snapshot: engine.snapshot(),
        landmarks: engine.landmarks(),
    }))
}

/// Get the active configuration for a session
async fn get_config(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<EngineConfig>, StatusCode> {
    let sessions = state.sessions.read().await;
    let session = sessions.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    let engine = session.engine.lock().await;
    Ok(Json(engine.config().clone()))
}

/// WebSocket handler for live updates
async fn websocket_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, StatusCode> {
    let sessions = state.sessions.read().await;
    let session = sessions.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    let rx = session.update_tx.subscribe();
    drop(sessions);

    Ok(ws.on_upgrade(move |socket| async move {
        handle_websocket(socket, rx).await;
    }))
}

/// Pump broadcast frames into one WebSocket connection
async fn handle_websocket(socket: WebSocket, mut rx: broadcast::Receiver<WsFrame>) {
    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            frame = rx.recv() => {
                let Ok(frame) = frame else { break };
                let json = serde_json::to_string(&frame).unwrap_or_default();
                if sender.send(Message::Text(json)).await.is_err() {
                    break;
                }
            }
            msg = receiver.next() => {
                // Client messages are ignored; closure ends the pump
                match msg {
                    None | Some(Err(_)) | Some(Ok(Message::Close(_))) => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }
}

/// Generate session ID
fn generate_session_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    format!("session_{:x}", nanos as u64)
}

/// Run the API server
pub async fn run_server(addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    let router = create_router();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr, "phase engine monitor listening");
    println!("🜂 Thermo-0 monitor running on {}", addr);
    println!("  POST /session/new         - Create session");
    println!("  GET  /session/:id         - Get snapshot");
    println!("  POST /session/:id/scroll  - Feed scroll event");
    println!("  GET  /session/:id/config  - Get configuration");
    println!("  WS   /ws/:id              - Live updates");
    println!("  GET  /health              - Health check");
    axum::serve(listener, router).await?;
    Ok(())
}

//! HTTP surface: documentation root, Streamable HTTP and legacy SSE transports.

use std::collections::HashMap;
use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use futures::stream::{self, Stream, StreamExt};
use rand::Rng;
use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use yfmcp_types::ServerConfig;
use yfmcp_yahoo::YahooFinance;

use crate::docs;
use crate::protocol::McpHandler;
use crate::tools::ToolRegistry;

/// Replies buffered per SSE session before senders wait.
const SESSION_BUFFER: usize = 32;

/// Server startup and runtime failures.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The configured bind address is not an IP address.
    #[error("invalid bind address {0}")]
    Address(String),
    /// Binding or serving failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Open SSE sessions, keyed by session id.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    senders: Mutex<HashMap<String, mpsc::Sender<Value>>>,
}

impl SessionRegistry {
    fn lock(&self) -> MutexGuard<'_, HashMap<String, mpsc::Sender<Value>>> {
        self.senders.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn open(self: &Arc<Self>) -> (String, mpsc::Receiver<Value>, SessionGuard) {
        let id = format!("{:032x}", rand::rng().random::<u128>());
        let (tx, rx) = mpsc::channel(SESSION_BUFFER);
        self.lock().insert(id.clone(), tx);
        let guard = SessionGuard {
            id: id.clone(),
            sessions: Arc::clone(self),
        };
        (id, rx, guard)
    }

    fn sender(&self, id: &str) -> Option<mpsc::Sender<Value>> {
        self.lock().get(id).cloned()
    }

    /// Number of open sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when no session is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// Removes its session when the event stream is dropped.
struct SessionGuard {
    id: String,
    sessions: Arc<SessionRegistry>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.sessions.lock().remove(&self.id);
        tracing::info!(session = %self.id, "sse session closed");
    }
}

/// Shared router state.
#[derive(Clone)]
pub struct AppState {
    handler: McpHandler,
    sessions: Arc<SessionRegistry>,
    closing: Arc<watch::Sender<bool>>,
}

impl AppState {
    /// State serving the tools of `yahoo`.
    #[must_use]
    pub fn new(yahoo: YahooFinance) -> Self {
        let tools = Arc::new(ToolRegistry::new(Arc::new(yahoo)));
        let (closing, _) = watch::channel(false);
        Self {
            handler: McpHandler::new(tools),
            sessions: Arc::new(SessionRegistry::default()),
            closing: Arc::new(closing),
        }
    }

    /// Open SSE sessions.
    #[must_use]
    pub const fn sessions(&self) -> &Arc<SessionRegistry> {
        &self.sessions
    }

    /// End every open SSE stream so graceful shutdown can complete.
    pub fn close_streams(&self) {
        self.closing.send_replace(true);
    }
}

#[derive(Debug, Deserialize)]
struct SessionQuery {
    #[serde(rename = "sessionId")]
    session_id: Option<String>,
}

/// Build the router: `/`, `/mcp`, `/sse`, `/sse/message`; anything else is 404.
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    let mut router = Router::new()
        .route("/", get(root).fallback(not_found))
        .route("/mcp", post(mcp).fallback(not_found))
        .route("/sse", get(sse_open).fallback(not_found))
        .route("/sse/message", post(sse_message).fallback(not_found))
        .fallback(not_found)
        .with_state(state);

    if config.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        router = router.layer(cors);
    }

    router.layer(TraceLayer::new_for_http())
}

/// Bind and serve until Ctrl-C.
///
/// # Errors
/// `Address` for an unparsable bind address, `Io` when binding or serving fails.
pub async fn serve(config: ServerConfig, yahoo: YahooFinance) -> Result<(), ServerError> {
    let ip: IpAddr = config
        .bind_address
        .parse()
        .map_err(|e| ServerError::Address(format!("{}: {e}", config.bind_address)))?;
    let addr = SocketAddr::new(ip, config.port);

    let state = AppState::new(yahoo);
    let app = router(state.clone(), &config);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("MCP server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %err, "failed to listen for shutdown signal");
            }
            tracing::info!("MCP server shutting down...");
            state.close_streams();
        })
        .await?;

    Ok(())
}

async fn root() -> Json<Value> {
    Json(docs::document())
}

async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({"error": "Not found"}))).into_response()
}

async fn mcp(State(state): State<AppState>, body: Bytes) -> Response {
    match state.handler.handle_bytes(&body).await {
        Some(reply) => Json(reply).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

async fn sse_open(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (id, rx, guard) = state.sessions.open();
    tracing::info!(session = %id, "sse session opened");

    let endpoint = Event::default()
        .event("endpoint")
        .data(format!("/sse/message?sessionId={id}"));

    let messages = stream::unfold((rx, guard), |(mut rx, guard)| async move {
        let message = rx.recv().await?;
        let event = Event::default().event("message").data(message.to_string());
        Some((Ok::<_, Infallible>(event), (rx, guard)))
    });

    let mut closing = state.closing.subscribe();
    let stream = stream::once(async move { Ok::<_, Infallible>(endpoint) })
        .chain(messages)
        .take_until(async move {
            let _ = closing.wait_for(|closed| *closed).await;
        });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

async fn sse_message(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
    body: Bytes,
) -> Response {
    let Some(id) = query.session_id else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Missing sessionId"})),
        )
            .into_response();
    };
    let Some(sender) = state.sessions.sender(&id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Unknown session"})),
        )
            .into_response();
    };

    let handler = state.handler.clone();
    tokio::spawn(async move {
        if let Some(reply) = handler.handle_bytes(&body).await
            && sender.send(reply).await.is_err()
        {
            tracing::debug!(session = %id, "sse session closed before reply");
        }
    });

    StatusCode::ACCEPTED.into_response()
}

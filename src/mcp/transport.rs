//! HTTP transport for the MCP server.
//!
//! Two ways in, both behind bearer authentication:
//! - `GET /sse` + `POST /messages/?session_id=..`: the SSE transport. Each
//!   response is pushed to the client's event stream.
//! - `POST /mcp`: one JSON-RPC message in, the response in the body.
//!
//! `/health` and the OAuth protected resource metadata are public.

use super::server::McpServer;
use super::protocol::{JsonRpcResponse, PARSE_ERROR};
use crate::auth::TokenVerifier;
use crate::config::ResolvedAuth;
use axum::{
    body::Bytes,
    extract::{Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use futures::stream::{self, Stream, StreamExt};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

/// Path clients post SSE-session messages to.
pub const MESSAGES_PATH: &str = "/messages/";
const PROTECTED_RESOURCE_PATH: &str = "/.well-known/oauth-protected-resource";
const SESSION_BUFFER: usize = 32;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    server: Arc<McpServer>,
    verifier: Arc<dyn TokenVerifier>,
    auth: Arc<ResolvedAuth>,
    resource_metadata_url: String,
    sessions: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(server: McpServer, verifier: Arc<dyn TokenVerifier>, auth: ResolvedAuth) -> Self {
        let resource_metadata_url = url::Url::parse(&auth.resource_server_url)
            .and_then(|u| u.join(PROTECTED_RESOURCE_PATH))
            .map(|u| u.to_string())
            .unwrap_or_else(|_| {
                format!(
                    "{}{}",
                    auth.resource_server_url.trim_end_matches('/'),
                    PROTECTED_RESOURCE_PATH
                )
            });

        Self {
            server: Arc::new(server),
            verifier,
            auth: Arc::new(auth),
            resource_metadata_url,
            sessions: Arc::new(SessionRegistry::default()),
        }
    }

    /// Number of open SSE sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// 401/403 with an RFC 6750 challenge pointing at the resource metadata.
    fn challenge(&self, status: StatusCode, error: &str, description: &str) -> Response {
        let value = format!(
            "Bearer error=\"{}\", error_description=\"{}\", resource_metadata=\"{}\"",
            error, description, self.resource_metadata_url
        );
        (
            status,
            [(header::WWW_AUTHENTICATE, value)],
            Json(json!({ "error": error, "error_description": description })),
        )
            .into_response()
    }
}

/// Build the router with all routes.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let protected = Router::new()
        .route("/sse", get(sse_connect))
        .route(MESSAGES_PATH, post(sse_message))
        .route("/mcp", post(mcp_post))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    Router::new()
        .route("/health", get(health))
        .route(PROTECTED_RESOURCE_PATH, get(protected_resource_metadata))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// === Sessions ===

/// Open SSE sessions, keyed by session id.
#[derive(Default)]
struct SessionRegistry {
    sessions: Mutex<HashMap<String, mpsc::Sender<String>>>,
}

impl SessionRegistry {
    fn open(self: &Arc<Self>) -> (String, mpsc::Receiver<String>, SessionGuard) {
        let id = uuid::Uuid::new_v4().simple().to_string();
        let (tx, rx) = mpsc::channel(SESSION_BUFFER);
        self.lock().insert(id.clone(), tx);

        let guard = SessionGuard {
            id: id.clone(),
            registry: Arc::clone(self),
        };
        (id, rx, guard)
    }

    fn sender(&self, id: &str) -> Option<mpsc::Sender<String>> {
        self.lock().get(id).cloned()
    }

    fn len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, mpsc::Sender<String>>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Removes its session when the event stream is dropped.
struct SessionGuard {
    id: String,
    registry: Arc<SessionRegistry>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.registry.lock().remove(&self.id);
        info!(session_id = %self.id, "SSE session closed");
    }
}

// === Middleware ===

async fn require_bearer(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, t)| t.trim().to_string());

    let Some(token) = token.filter(|t| !t.is_empty()) else {
        return state.challenge(
            StatusCode::UNAUTHORIZED,
            "invalid_token",
            "Authentication required",
        );
    };

    let claims = match state.verifier.verify(&token).await {
        Ok(claims) => claims,
        Err(e) => {
            warn!("Rejected bearer token: {}", e);
            return state.challenge(
                StatusCode::UNAUTHORIZED,
                "invalid_token",
                "Invalid or expired token",
            );
        }
    };

    let missing = claims.missing_scopes(&state.auth.required_scopes);
    if !missing.is_empty() {
        warn!(sub = %claims.sub, "Token missing scopes: {}", missing.join(" "));
        return state.challenge(
            StatusCode::FORBIDDEN,
            "insufficient_scope",
            &format!("Required scope: {}", missing.join(" ")),
        );
    }

    debug!(sub = %claims.sub, "Request authorized");
    request.extensions_mut().insert(claims);
    next.run(request).await
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn protected_resource_metadata(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "resource": state.auth.resource_server_url,
        "authorization_servers": [state.auth.issuer_url],
        "scopes_supported": state.auth.required_scopes,
        "bearer_methods_supported": ["header"],
    }))
}

async fn sse_connect(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (session_id, rx, guard) = state.sessions.open();
    info!(session_id = %session_id, "SSE session opened");

    let endpoint = Event::default()
        .event("endpoint")
        .data(format!("{}?session_id={}", MESSAGES_PATH, session_id));

    let messages = stream::unfold((rx, guard), |(mut rx, guard)| async move {
        let message = rx.recv().await?;
        let event = Event::default().event("message").data(message);
        Some((Ok::<_, Infallible>(event), (rx, guard)))
    });

    let events = stream::once(async move { Ok::<_, Infallible>(endpoint) }).chain(messages);
    Sse::new(events).keep_alive(KeepAlive::default())
}

#[derive(Debug, Deserialize)]
struct SessionQuery {
    session_id: String,
}

async fn sse_message(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
    body: Bytes,
) -> Response {
    let Some(sender) = state.sessions.sender(&query.session_id) else {
        return (StatusCode::NOT_FOUND, "Could not find session").into_response();
    };

    let message: Value = match serde_json::from_slice(&body) {
        Ok(message) => message,
        Err(e) => {
            return (StatusCode::BAD_REQUEST, format!("Could not parse message: {}", e))
                .into_response()
        }
    };

    let server = Arc::clone(&state.server);
    tokio::spawn(async move {
        let Some(response) = server.handle_message(message).await else {
            return;
        };
        match serde_json::to_string(&response) {
            Ok(json) => {
                if sender.send(json).await.is_err() {
                    debug!("Session closed before the response was sent");
                }
            }
            Err(e) => warn!("Failed to encode response: {}", e),
        }
    });

    (StatusCode::ACCEPTED, "Accepted").into_response()
}

async fn mcp_post(State(state): State<AppState>, body: Bytes) -> Response {
    let message: Value = match serde_json::from_slice(&body) {
        Ok(message) => message,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(JsonRpcResponse::error(None, PARSE_ERROR, "Parse error")),
            )
                .into_response()
        }
    };

    match state.server.handle_message(message).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

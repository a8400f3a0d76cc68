//! HTTP server setup and the ingestion handler.
//!
//! # Responsibilities
//! - Create the Axum router and wire up middleware
//! - Bind the server to a listener, serve until shutdown
//! - Run the ingestion lifecycle: resolve route → authenticate →
//!   validate → bounded body read → encode → resolve output → write
//!
//! # Design Decisions
//! - Any path shape is accepted; the route table, not the URL layout,
//!   decides what a request means
//! - Every failure is terminal for its request; nothing is retried
//! - Append handles are flushed and closed after the listener drains

use axum::{
    body::Body,
    extract::State,
    http::{header, Method, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use chrono::Utc;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::RouteMap;
use crate::http::error::SinkError;
use crate::http::request::{request_id, RequestIdLayer};
use crate::lifecycle::ShutdownHandle;
use crate::record::Envelope;
use crate::routing::{authorized, RouteTable, RECEIVER_TOKEN_HEADER};
use crate::storage::{write_fresh, AppendFileManager};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<RouteTable>,
    pub appends: Arc<AppendFileManager>,
}

/// HTTP server for the ingestion sink.
pub struct HttpServer {
    router: Router,
    appends: Arc<AppendFileManager>,
}

impl HttpServer {
    /// Create a new server from a validated route map.
    pub fn new(routes: RouteMap) -> Self {
        let appends = Arc::new(AppendFileManager::from_routes(&routes));
        let state = AppState {
            table: Arc::new(RouteTable::new(routes)),
            appends: appends.clone(),
        };
        let router = Self::build_router(state);
        Self { router, appends }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(ingest_handler))
            .route("/", any(ingest_handler))
            .with_state(state)
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until `shutdown` fires, then flush append handles.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: ShutdownHandle,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router.into_make_service();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { shutdown.wait().await })
            .await?;

        self.appends.close_all().await;
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main ingestion handler. Every request, any path, lands here.
async fn ingest_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let request_id = request_id(&request).unwrap_or("unknown").to_string();
    let path = request.uri().path().to_string();

    match handle_ingest(&state, request).await {
        Ok(written_to) => {
            tracing::debug!(
                request_id = %request_id,
                path = %path,
                written_to = %written_to,
                "payload accepted"
            );
            (StatusCode::OK, [(header::CONTENT_TYPE, "text/plain")], "").into_response()
        }
        Err(err) => {
            if err.is_server_fault() {
                tracing::error!(
                    request_id = %request_id,
                    path = %path,
                    error = %err,
                    "ingestion failed"
                );
            } else {
                tracing::warn!(
                    request_id = %request_id,
                    path = %path,
                    error = %err,
                    "request rejected"
                );
            }
            (
                err.status(),
                [(header::CONTENT_TYPE, "text/plain")],
                err.public_message(),
            )
                .into_response()
        }
    }
}

/// The linear ingestion lifecycle. Returns the path written to.
async fn handle_ingest(state: &AppState, request: Request<Body>) -> Result<String, SinkError> {
    let path = request.uri().path().to_string();
    let query = request.uri().query().unwrap_or("").to_string();

    let (route_name, cfg) = state
        .table
        .resolve(&path, &query)
        .ok_or(SinkError::RouteNotFound)?;

    let headers = request.headers();
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    let receiver_token = headers
        .get(RECEIVER_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());
    if !authorized(&cfg.secret, &path, authorization, receiver_token) {
        return Err(SinkError::Forbidden);
    }

    if request.method() != Method::POST {
        return Err(SinkError::BadMethod);
    }

    let declared_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    if !cfg.content_type.is_empty() && cfg.content_type != declared_type {
        return Err(SinkError::ContentTypeMismatch);
    }

    // Hard failure past the limit, never a silent truncation.
    let limit = usize::try_from(cfg.max_bytes).unwrap_or(usize::MAX);
    let body = request.into_body();
    let data = axum::body::to_bytes(body, limit)
        .await
        .map_err(|e| SinkError::ReadBody(e.to_string()))?;

    let blob = if cfg.raw {
        data.to_vec()
    } else {
        // Arrival time is captured after the body is fully read.
        Envelope::new(Utc::now().timestamp_millis(), data.to_vec(), declared_type).encode()?
    };

    let written_to = if cfg.is_append() {
        state.appends.write(route_name, cfg, &blob).await?
    } else {
        write_fresh(&cfg.out_template, Utc::now(), &blob)?
    };
    Ok(written_to)
}

//! HTTP server implementation.
//!
//! This module provides the axum-based HTTP server that serves the selection
//! page and the list/get endpoints in both encodings.

use axum::{
    Router,
    extract::{Query, State},
    http::{Method, StatusCode, header},
    response::{Html, IntoResponse, Json, Response},
    routing::get,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use super::templates::IndexPage;
use crate::error::ApiError;
use crate::format::Encoding;
use crate::resolver::resolve;
use crate::store::ConfigStore;

/// State shared across handlers. Everything in it is read-only.
#[derive(Clone)]
pub struct AppState {
    store: Arc<ConfigStore>,
    index: Arc<IndexPage>,
}

impl AppState {
    pub fn new(store: Arc<ConfigStore>, index: Arc<IndexPage>) -> Self {
        Self { store, index }
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn index(&self) -> &IndexPage {
        &self.index
    }
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    configs: usize,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.is_not_found() {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(self)).into_response()
    }
}

/// Encode `value` or turn the encoding failure into an error response.
fn encoded<T: Serialize + ?Sized>(encoding: Encoding, value: &T) -> Response {
    match encoding.encode(value) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, encoding.content_type())],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to encode response");
            ApiError::from(e).into_response()
        }
    }
}

/// Root endpoint - the config selection page.
async fn index(State(state): State<AppState>) -> Html<String> {
    Html(state.index().render(&state.store().sorted_names()))
}

fn list_configs(state: &AppState, encoding: Encoding) -> Response {
    let names = state.store().sorted_names();
    debug!(count = names.len(), "Listing configs");
    encoded(encoding, &names)
}

async fn json_list(State(state): State<AppState>) -> Response {
    list_configs(&state, Encoding::Json)
}

async fn yaml_list(State(state): State<AppState>) -> Response {
    list_configs(&state, Encoding::Yaml)
}

/// Collect the repeated `name` parameters, keeping their order.
fn requested_names(params: Vec<(String, String)>) -> Vec<String> {
    params
        .into_iter()
        .filter(|(key, _)| key == "name")
        .map(|(_, value)| value)
        .collect()
}

fn get_configs(state: &AppState, params: Vec<(String, String)>, encoding: Encoding) -> Response {
    let names = requested_names(params);
    if names.is_empty() {
        info!("No config names provided, getting all configs");
    } else {
        info!(names = ?names, "Getting configs");
    }

    match resolve(state.store(), &names) {
        Ok(merged) => encoded(encoding, &merged),
        Err(e) => {
            let err = ApiError::from(e);
            if err.is_not_found() {
                warn!(error = %err, "Requested config not found");
            } else {
                error!(error = %err, "Failed to merge configs");
            }
            err.into_response()
        }
    }
}

async fn json_get(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    get_configs(&state, params, Encoding::Json)
}

async fn yaml_get(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    get_configs(&state, params, Encoding::Yaml)
}

/// Health check endpoint.
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        configs: state.store().len(),
    })
}

/// Build the router with all routes.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(index))
        .route("/json/list", get(json_list))
        .route("/yaml/list", get(yaml_list))
        .route("/json/get", get(json_get))
        .route("/yaml/get", get(yaml_get))
        .route("/api/health", get(health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handle for a running server.
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ServerHandle {
    /// Address the server is bound to.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop accepting connections and wait for in-flight requests to finish.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Err(e) = self.task.await {
            error!("Server task failed: {}", e);
        }
    }
}

/// Bind `addr` and serve in a background task.
///
/// Binding happens before this returns, so a port conflict is reported to the
/// caller rather than logged from the task.
pub async fn start_server(addr: &str, state: AppState) -> anyhow::Result<ServerHandle> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    info!("Server listening on http://{}", bound_addr);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("Server shutting down");
            })
            .await
        {
            error!("Server error: {}", e);
        }
    });

    Ok(ServerHandle {
        addr: bound_addr,
        shutdown_tx: Some(shutdown_tx),
        task,
    })
}

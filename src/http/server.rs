//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all gateway routes
//! - Wire up middleware (tracing, request ID, metrics, admission)
//! - Hold the shared application state (backends, clients, cache, gate)
//! - Serve with graceful shutdown
//!
//! Middleware order, outermost first: trace → request ID → metrics →
//! admission → routes. Admission sits directly in front of the routes so a
//! rejected request still carries a request id but triggers no routing,
//! caching, or downstream work.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, Uri};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use axum::Router;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;
use url::Url;

use crate::admission::{admission_middleware, AdmissionGate};
use crate::aggregate;
use crate::cache::CacheStore;
use crate::config::{validate_config, ConfigError, GatewayConfig};
use crate::http::request::request_id_middleware;
use crate::observability::metrics;
use crate::upstream::{forward_to_recipes, forward_to_sports, Backend};

/// Index chooser for the random-recipe endpoints. Receives the collection
/// length, returns an index. Injected so tests can make selection
/// deterministic.
pub type RecipePicker = Arc<dyn Fn(usize) -> usize + Send + Sync>;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub sports: Backend,
    pub recipes: Backend,
    /// Streaming client used by the generic forwarder.
    pub forward_client: Client<HttpConnector, Body>,
    pub cache: CacheStore,
    pub upstream_timeout: Duration,
    pub cache_ttl_secs: u64,
    pub recipe_picker: RecipePicker,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    state: AppState,
    gate: AdmissionGate,
}

impl HttpServer {
    /// Create a new server from a validated configuration.
    pub async fn new(config: GatewayConfig) -> Result<Self, ConfigError> {
        validate_config(&config)?;

        let upstream_timeout = Duration::from_millis(config.timeouts.upstream_ms);

        let json_client = reqwest::Client::builder()
            .timeout(upstream_timeout)
            .build()
            .map_err(|e| ConfigError::Validation(format!("failed to build HTTP client: {e}")))?;

        let sports_url = parse_backend_url("backends.sports_url", &config.backends.sports_url)?;
        let recipes_url = parse_backend_url("backends.recipes_url", &config.backends.recipes_url)?;
        let sports = Backend::new("nba", sports_url, json_client.clone())?;
        let recipes = Backend::new("recipes", recipes_url, json_client)?;

        let forward_client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        let cache = CacheStore::from_config(&config.cache).await;
        let gate = AdmissionGate::new(config.admission.max_concurrent_requests);

        Ok(Self {
            state: AppState {
                sports,
                recipes,
                forward_client,
                cache,
                upstream_timeout,
                cache_ttl_secs: config.cache.ttl_secs,
                recipe_picker: Arc::new(|len| fastrand::usize(..len)),
            },
            gate,
        })
    }

    /// Replace the cache store. Tests use this to observe cache contents.
    pub fn with_cache_store(mut self, store: CacheStore) -> Self {
        self.state.cache = store;
        self
    }

    /// Replace the random-recipe index picker with a deterministic one.
    pub fn with_recipe_picker(mut self, picker: RecipePicker) -> Self {
        self.state.recipe_picker = picker;
        self
    }

    /// Handle to the admission gate, for introspection in tests.
    pub fn admission_gate(&self) -> AdmissionGate {
        self.gate.clone()
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState, gate: AdmissionGate) -> Router {
        Router::new()
            .route("/status", get(gateway_status))
            .route("/services-status", get(aggregate::services_status))
            .route("/recipe-by-team/{team_id_or_name}", get(aggregate::recipe_by_team))
            .route(
                "/recipe-by-player/{player_id_or_name}",
                get(aggregate::recipe_by_player),
            )
            .route(
                "/recipe-starting-with-team/{team_id_or_name}",
                get(aggregate::recipe_starting_with_team),
            )
            .route("/nba", any(forward_to_sports))
            .route("/nba/{*path}", any(forward_to_sports))
            .route("/recipes", any(forward_to_recipes))
            .route("/recipes/{*path}", any(forward_to_recipes))
            .with_state(state)
            .layer(middleware::from_fn_with_state(gate, admission_middleware))
            .layer(middleware::from_fn(track_requests))
            .layer(middleware::from_fn(request_id_middleware))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until the shutdown signal fires or Ctrl+C arrives.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> std::io::Result<()> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Gateway listening");

        let app = Self::build_router(self.state, self.gate);

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown.recv() => {}
                    _ = ctrl_c() => {}
                }
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("Gateway stopped");
        Ok(())
    }
}

fn parse_backend_url(name: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::Validation(format!("{name} is not a valid URL: {e}")))
}

/// `GET /status`: gateway liveness, served cache-aside.
///
/// Key is the request's full path+query. A store-level lookup failure is
/// logged and degraded to a miss; a store failure after computing the body is
/// logged and ignored, the response was already produced.
async fn gateway_status(State(state): State<AppState>, uri: Uri) -> Response {
    let key = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    match state.cache.lookup(&key).await {
        Ok(Some(cached)) => {
            metrics::record_cache_hit(&key);
            tracing::debug!(key = %key, "Cache hit");
            return json_response(cached);
        }
        Ok(None) => metrics::record_cache_miss(&key),
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Cache lookup failed, treating as miss");
            metrics::record_cache_miss(&key);
        }
    }

    let body = json!({ "message": "Gateway is running" }).to_string();
    if let Err(e) = state.cache.store(&key, &body, state.cache_ttl_secs).await {
        tracing::warn!(key = %key, error = %e, "Cache write failed");
    }
    json_response(body)
}

fn json_response(body: String) -> Response {
    (
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}

/// Middleware recording per-request metrics.
async fn track_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let path = request.uri().path().to_string();
    let response = next.run(request).await;
    metrics::record_request(&path, response.status().as_u16(), start);
    response
}

/// Wait for Ctrl+C; if the handler cannot be installed, wait forever so the
/// broadcast channel remains the only shutdown path.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}

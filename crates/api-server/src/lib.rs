pub mod config;
pub mod dashboard_routes;
pub mod request_id;
pub mod symbol_lookup;
pub mod symbol_routes;

pub use config::ServerConfig;
pub use symbol_lookup::SymbolLookup;

use axum::{
    http::{HeaderValue, Method, Request, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use dashboard_orchestrator::DashboardAggregator;
use ml_client::{HttpPredictionBackend, MLClient, MLConfig};
use polygon_client::PolygonClient;
use serde::Serialize;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

#[derive(Clone)]
pub struct AppState {
    pub aggregator: DashboardAggregator,
    pub symbols: Arc<SymbolLookup>,
}

impl AppState {
    pub fn new(aggregator: DashboardAggregator, symbols: SymbolLookup) -> Self {
        Self {
            aggregator,
            symbols: Arc::new(symbols),
        }
    }

    /// Wire the HTTP backend and the Polygon lookup from environment variables.
    pub fn from_env() -> Self {
        let ml_config = MLConfig::from_env();
        tracing::info!("Prediction backend: {}", ml_config.base_url);
        let backend = HttpPredictionBackend::from(MLClient::new(ml_config));

        let symbols = SymbolLookup::new(PolygonClient::from_env());
        if !symbols.is_configured() {
            tracing::warn!("POLYGON_API_KEY not set; /api/symbols will report a configuration error");
        }

        Self::new(DashboardAggregator::new(Arc::new(backend)), symbols)
    }
}

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// Error returned by handlers.
///
/// Errors built with [`AppError::public`] show their message to the client.
/// Anything converted through `?` is logged and reported as a generic 500.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    error: anyhow::Error,
    public: bool,
}

impl AppError {
    pub fn public(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            error: anyhow::anyhow!(message.into()),
            public: true,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: err.into(),
            public: false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("Request failed ({}): {:#}", self.status, self.error);
        } else {
            tracing::warn!("Request rejected ({}): {:#}", self.status, self.error);
        }

        let message = if self.public {
            self.error.to_string()
        } else {
            "Internal server error".to_string()
        };

        let body = ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(message),
        };
        (self.status, Json(body)).into_response()
    }
}

#[derive(OpenApi)]
#[openapi(
    info(title = "StockSight API", description = "Ticker lookup and stock dashboard"),
    paths(
        health,
        symbol_routes::lookup_symbols,
        symbol_routes::suggest_symbols,
        dashboard_routes::get_dashboard,
    ),
    components(schemas(
        dashboard_core::Symbol,
        dashboard_core::DashboardResult,
        dashboard_core::NewsItem,
        dashboard_core::RedditPost,
        dashboard_core::DashboardSection,
    )),
    tags(
        (name = "Symbols", description = "Ticker lookup and suggestions"),
        (name = "Dashboard", description = "Aggregated per-ticker dashboard"),
    )
)]
pub struct ApiDoc;

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up")),
    tag = "Dashboard"
)]
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok", "service": "api-server" }))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    if config.cors_allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}

pub fn router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(symbol_routes::symbol_routes())
        .merge(dashboard_routes::dashboard_routes())
        .with_state(state)
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<axum::body::Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .layer(cors_layer(config))
}

/// Install the global subscriber. `RUST_LOG_FORMAT=json` switches to JSON lines.
pub fn init_tracing() {
    let filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };

    let json = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter()).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter()).init();
    }

    std::panic::set_hook(Box::new(|info| {
        eprintln!("PANIC: {info}");
        tracing::error!("PANIC: {info}");
    }));
}

pub async fn run_server() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env()?;
    let state = AppState::from_env();
    let app = router(state, &config);

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::warn!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::warn!("Received terminate signal, shutting down..."),
    }
}

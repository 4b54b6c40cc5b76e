//! Symbol lookup API routes
//!
//! `/api/symbols` is the proxy the dashboard's search box calls; the
//! upstream API key never reaches the browser.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use dashboard_core::Symbol;
use serde::Deserialize;

use crate::symbol_lookup::{LookupNotConfigured, DEFAULT_LOOKUP_LIMIT};
use crate::{ApiResponse, AppError, AppState};

pub const NOT_CONFIGURED_MESSAGE: &str = "Symbol lookup is not configured";

#[derive(Deserialize, utoipa::IntoParams)]
pub struct SymbolQuery {
    /// Partial ticker or company name
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

pub fn symbol_routes() -> Router<AppState> {
    Router::new()
        .route("/api/symbols", get(lookup_symbols))
        .route("/api/symbols/suggest", get(suggest_symbols))
}

#[utoipa::path(
    get,
    path = "/api/symbols",
    params(SymbolQuery),
    responses(
        (status = 200, description = "Matching tickers; empty when the upstream lookup failed"),
        (status = 500, description = "Symbol lookup is not configured"),
    ),
    tag = "Symbols"
)]
pub async fn lookup_symbols(
    State(state): State<AppState>,
    Query(query): Query<SymbolQuery>,
) -> Result<Json<ApiResponse<Vec<Symbol>>>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_LOOKUP_LIMIT);

    let symbols = state
        .symbols
        .lookup(&query.q, limit)
        .await
        .map_err(|LookupNotConfigured| {
            AppError::public(StatusCode::INTERNAL_SERVER_ERROR, NOT_CONFIGURED_MESSAGE)
        })?;

    Ok(Json(ApiResponse::success(symbols)))
}

#[utoipa::path(
    get,
    path = "/api/symbols/suggest",
    params(SymbolQuery),
    responses((status = 200, description = "Up to ten ranked suggestions, popular tickers first")),
    tag = "Symbols"
)]
pub async fn suggest_symbols(
    State(state): State<AppState>,
    Query(query): Query<SymbolQuery>,
) -> Json<ApiResponse<Vec<Symbol>>> {
    Json(ApiResponse::success(state.symbols.suggest(&query.q).await))
}

#[cfg(test)]
mod tests {
    use crate::testing::*;
    use crate::{router, ServerConfig};
    use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
    use polygon_client::PolygonClient;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    async fn polygon_stub() -> (PolygonClient, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let upstream = Router::new().route(
            "/v3/reference/tickers",
            get(move |Query(params): Query<HashMap<String, String>>| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    let search = params.get("search").cloned().unwrap_or_default();
                    let results = if search == "aa" {
                        json!([
                            { "ticker": "AAON", "name": "AAON, Inc." },
                            { "ticker": "AAL", "name": "American Airlines Group Inc." },
                            { "ticker": "AAPL", "name": "Apple Inc." },
                        ])
                    } else {
                        json!([])
                    };
                    Json(json!({ "status": "OK", "results": results }))
                }
            }),
        );
        let client = PolygonClient::new("test-key".to_string())
            .with_base_url(serve(upstream).await)
            .with_rate_limit(100);
        (client, hits)
    }

    async fn failing_polygon() -> PolygonClient {
        let upstream = Router::new().route(
            "/v3/reference/tickers",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream down") }),
        );
        PolygonClient::new("test-key".to_string())
            .with_base_url(serve(upstream).await)
            .with_rate_limit(100)
    }

    #[tokio::test]
    async fn test_missing_key_reports_configuration_error() {
        let app = router(state(FakeBackend::default(), None), &ServerConfig::default());
        let (status, body) = get_json(app, "/api/symbols?q=aa").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({ "success": false, "error": "Symbol lookup is not configured" })
        );
    }

    #[tokio::test]
    async fn test_lookup_proxies_upstream() {
        let (polygon, _) = polygon_stub().await;
        let app = router(
            state(FakeBackend::default(), Some(polygon)),
            &ServerConfig::default(),
        );
        let (status, body) = get_json(app, "/api/symbols?q=AA").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"][2], json!({ "symbol": "AAPL", "name": "Apple Inc." }));
    }

    #[tokio::test]
    async fn test_lookup_is_cached() {
        let (polygon, hits) = polygon_stub().await;
        let app = router(
            state(FakeBackend::default(), Some(polygon)),
            &ServerConfig::default(),
        );

        get_json(app.clone(), "/api/symbols?q=aa").await;
        let (_, body) = get_json(app, "/api/symbols?q=%20AA%20").await;

        assert_eq!(body["data"].as_array().map(Vec::len), Some(3));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_upstream_failure_yields_empty_list() {
        let app = router(
            state(FakeBackend::default(), Some(failing_polygon().await)),
            &ServerConfig::default(),
        );
        let (status, body) = get_json(app, "/api/symbols?q=aa").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true, "data": [] }));
    }

    #[tokio::test]
    async fn test_suggest_ranks_popular_first() {
        let (polygon, _) = polygon_stub().await;
        let app = router(
            state(FakeBackend::default(), Some(polygon)),
            &ServerConfig::default(),
        );
        let (_, body) = get_json(app, "/api/symbols/suggest?q=aa").await;

        let codes: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["symbol"].as_str().unwrap())
            .collect();
        assert_eq!(codes, vec!["AAPL", "AAL", "AAON"]);
    }

    #[tokio::test]
    async fn test_suggest_falls_back_to_popular_list() {
        let app = router(state(FakeBackend::default(), None), &ServerConfig::default());
        let (status, body) = get_json(app, "/api/symbols/suggest?q=nv").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["symbol"], "NVDA");
    }

    #[tokio::test]
    async fn test_empty_query_returns_nothing() {
        let (polygon, hits) = polygon_stub().await;
        let app = router(
            state(FakeBackend::default(), Some(polygon)),
            &ServerConfig::default(),
        );
        let (status, body) = get_json(app, "/api/symbols?q=").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!([]));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}

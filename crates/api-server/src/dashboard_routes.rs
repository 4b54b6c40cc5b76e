use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use dashboard_core::{DashboardError, DashboardResult};

use crate::request_id::RequestId;
use crate::{ApiResponse, AppError, AppState};

pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/api/dashboard/:ticker", get(get_dashboard))
}

fn dashboard_error(err: DashboardError) -> AppError {
    let status = match err {
        DashboardError::InvalidTicker => StatusCode::BAD_REQUEST,
        DashboardError::SectionFailed { .. } => StatusCode::BAD_GATEWAY,
        DashboardError::Superseded(_) => StatusCode::CONFLICT,
    };
    AppError::public(status, err.to_string())
}

/// Price prediction, news and Reddit sentiment, and financials for one
/// ticker. Fails as a whole when any section fails.
#[utoipa::path(
    get,
    path = "/api/dashboard/{ticker}",
    params(("ticker" = String, Path, description = "Stock ticker symbol")),
    responses(
        (status = 200, description = "Merged dashboard for the ticker", body = DashboardResult),
        (status = 400, description = "Empty ticker"),
        (status = 502, description = "A backend section failed, e.g. \"Reddit API failed\""),
    ),
    tag = "Dashboard"
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
    request_id: Option<Extension<RequestId>>,
) -> Result<Json<ApiResponse<DashboardResult>>, AppError> {
    if let Some(Extension(id)) = &request_id {
        tracing::debug!("Dashboard request {} for {}", id, ticker);
    }

    let result = state
        .aggregator
        .load(&ticker)
        .await
        .map_err(dashboard_error)?;
    Ok(Json(ApiResponse::success(result)))
}

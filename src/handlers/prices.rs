use axum::{extract::State, response::Json};
use common::PriceSeries;
use tracing::instrument;

use crate::error::ApiError;
use crate::helpers::extract::ValidQuery;
use crate::helpers::requests::{load_history, require_ticker};
use crate::schemas::{ApiResponse, AppState, PriceQuery};

/// Get daily open/close prices for a ticker
#[utoipa::path(
    get,
    path = "/api/v1/prices",
    tag = "prices",
    params(PriceQuery),
    responses(
        (status = 200, description = "Price history retrieved successfully", body = ApiResponse<PriceSeries>),
        (status = 400, description = "Missing ticker or invalid date range", body = ErrorResponse),
        (status = 404, description = "Ticker not found", body = ErrorResponse),
        (status = 502, description = "Market data provider failed", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_prices(
    ValidQuery(query): ValidQuery<PriceQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<PriceSeries>>, ApiError> {
    let ticker = require_ticker(query.ticker.as_deref())?;

    let series = load_history(&state, &ticker, query.start_date, query.end_date).await?;
    let message = format!("Retrieved {} price points", series.len());

    Ok(Json(ApiResponse::ok(series, message)))
}

use axum::{extract::State, response::Json};
use common::ChartResponse;
use compute::{ComputeError, charts, forecast};
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::helpers::extract::ValidQuery;
use crate::helpers::requests::{chart_response, load_forecast_window, load_history, require_ticker};
use crate::schemas::{ApiResponse, AppState, ForecastQuery, PriceQuery};

/// Closing and opening price chart
#[utoipa::path(
    get,
    path = "/api/v1/charts/price",
    tag = "charts",
    params(PriceQuery),
    responses(
        (status = 200, description = "Price chart built successfully", body = ApiResponse<ChartResponse>),
        (status = 400, description = "Missing ticker or invalid date range", body = ErrorResponse),
        (status = 404, description = "Ticker not found", body = ErrorResponse),
        (status = 502, description = "Market data provider failed", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_price_chart(
    ValidQuery(query): ValidQuery<PriceQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ChartResponse>>, ApiError> {
    let ticker = require_ticker(query.ticker.as_deref())?;

    let series = load_history(&state, &ticker, query.start_date, query.end_date).await?;
    chart_response(&state, charts::price_chart(&series))
}

/// Exponential moving average chart of the closing price
#[utoipa::path(
    get,
    path = "/api/v1/charts/indicator",
    tag = "charts",
    params(PriceQuery),
    responses(
        (status = 200, description = "Indicator chart built successfully", body = ApiResponse<ChartResponse>),
        (status = 400, description = "Missing ticker or invalid date range", body = ErrorResponse),
        (status = 404, description = "Ticker not found", body = ErrorResponse),
        (status = 502, description = "Market data provider failed", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_indicator_chart(
    ValidQuery(query): ValidQuery<PriceQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ChartResponse>>, ApiError> {
    let ticker = require_ticker(query.ticker.as_deref())?;

    let series = load_history(&state, &ticker, query.start_date, query.end_date).await?;
    let spec = charts::indicator_chart(&series, state.settings.ewma_span)?;
    chart_response(&state, spec)
}

/// Linear trend forecast of the closing price
#[utoipa::path(
    get,
    path = "/api/v1/charts/forecast",
    tag = "charts",
    params(ForecastQuery),
    responses(
        (status = 200, description = "Forecast chart built successfully", body = ApiResponse<ChartResponse>),
        (status = 400, description = "Missing ticker or invalid day count", body = ErrorResponse),
        (status = 404, description = "Ticker not found", body = ErrorResponse),
        (status = 502, description = "Market data provider failed", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_forecast_chart(
    ValidQuery(query): ValidQuery<ForecastQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ChartResponse>>, ApiError> {
    let ticker = require_ticker(query.ticker.as_deref())?;
    let horizon = query.days.ok_or(ApiError::MissingInput("days"))? as usize;

    let window = load_forecast_window(&state, &ticker).await?;
    let spec = match forecast::forecast(&window, horizon) {
        Ok(result) => charts::forecast_chart(&result),
        Err(ComputeError::InsufficientData(reason)) => {
            info!(%ticker, %reason, "Forecast unavailable");
            charts::forecast_unavailable(horizon)
        }
        Err(other) => return Err(other.into()),
    };

    chart_response(&state, spec)
}

use axum::response::Json;
use chrono::{NaiveDate, Utc};
use common::{ChartResponse, ChartSpec, PriceSeries, Ticker};
use tracing::debug;

use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState};

/// Parses the ticker query parameter, treating absent and blank the same.
pub fn require_ticker(input: Option<&str>) -> Result<Ticker, ApiError> {
    input
        .and_then(Ticker::parse)
        .ok_or(ApiError::MissingInput("ticker"))
}

/// Today in UTC, the reference for open-ended date ranges.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Fetches the history for the date pickers' range.
pub async fn load_history(
    state: &AppState,
    ticker: &Ticker,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<PriceSeries, ApiError> {
    let range = market::resolve_range(start_date, end_date, today())?;
    debug!(%ticker, ?range, "Loading price history");
    Ok(state.provider.fetch_history(ticker, range).await?)
}

/// Fetches the window the forecast model is fitted on, ending at the latest session.
pub async fn load_forecast_window(state: &AppState, ticker: &Ticker) -> Result<PriceSeries, ApiError> {
    let lookback_days = state.settings.lookback_days;
    debug!(%ticker, lookback_days, "Loading forecast window");
    let window =
        market::fetch_trailing_window(state.provider.as_ref(), ticker, lookback_days, today()).await?;
    Ok(window)
}

/// Renders `spec` and wraps both in the chart endpoint payload.
pub fn chart_response(
    state: &AppState,
    spec: ChartSpec,
) -> Result<Json<ApiResponse<ChartResponse>>, ApiError> {
    let figure = state.renderer.render(&spec)?;
    let message = spec
        .empty_message
        .clone()
        .unwrap_or_else(|| "Chart built successfully".to_string());

    Ok(Json(ApiResponse::ok(ChartResponse { spec, figure }, message)))
}

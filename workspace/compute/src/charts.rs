//! Builders turning price data into renderer-agnostic chart specs.

use common::{ChartSeries, ChartSpec, PriceSeries, RenderMode};
use tracing::instrument;

use crate::error::Result;
use crate::forecast::ForecastResult;
use crate::frame;
use crate::indicator;

pub const PRICE_TITLE: &str = "Closing and Opening Price vs Date";
pub const INDICATOR_TITLE: &str = "Exponential Moving Average vs Date";
pub const NO_DATA_MESSAGE: &str = "No price data available for the selected range";
pub const NOT_ENOUGH_HISTORY_MESSAGE: &str = "Not enough history to forecast";

const DATE_FIELD: &str = "Date";

pub fn forecast_title(horizon: usize) -> String {
    format!("Predicted Close Price of next {} days", horizon)
}

/// Close and open lines against date.
pub fn price_chart(series: &PriceSeries) -> ChartSpec {
    let spec = ChartSpec::new(PRICE_TITLE, DATE_FIELD, "Price");
    if series.is_empty() {
        return spec.with_empty_message(NO_DATA_MESSAGE);
    }

    let dates = series.dates();
    spec.with_series(ChartSeries::new("Close", dates.clone(), series.closes(), RenderMode::Lines))
        .with_series(ChartSeries::new("Open", dates, series.opens(), RenderMode::Lines))
}

/// EWMA of the closes as connected line-plus-marker points.
#[instrument(skip(series), fields(ticker = %series.ticker))]
pub fn indicator_chart(series: &PriceSeries, span: usize) -> Result<ChartSpec> {
    let column = indicator::ewma_column(span);
    let spec = ChartSpec::new(INDICATOR_TITLE, DATE_FIELD, column.to_uppercase());
    if series.is_empty() {
        return Ok(spec.with_empty_message(NO_DATA_MESSAGE));
    }

    let df = indicator::with_ewma(frame::to_dataframe(series)?, span)?;
    let dates = frame::date_column(&df)?;
    let values = frame::f64_column(&df, &column)?;

    Ok(spec.with_series(ChartSeries::new(
        column.to_uppercase(),
        dates,
        values,
        RenderMode::LinesMarkers,
    )))
}

/// Observed closes followed by the projected ones.
pub fn forecast_chart(result: &ForecastResult) -> ChartSpec {
    let spec = ChartSpec::new(forecast_title(result.horizon()), DATE_FIELD, "Close Price");

    let observed = ChartSeries::new(
        "Observed",
        result.observed.iter().map(|p| p.date).collect(),
        result.observed.iter().map(|p| p.close).collect(),
        RenderMode::Lines,
    );
    let projected = ChartSeries::new(
        "Forecast",
        result.points.iter().map(|p| p.date).collect(),
        result.points.iter().map(|p| p.close).collect(),
        RenderMode::LinesMarkers,
    );

    spec.with_series(observed).with_series(projected)
}

/// Forecast panel shown when the model could not be fitted.
pub fn forecast_unavailable(horizon: usize) -> ChartSpec {
    ChartSpec::new(forecast_title(horizon), DATE_FIELD, "Close Price")
        .with_empty_message(NOT_ENOUGH_HISTORY_MESSAGE)
}

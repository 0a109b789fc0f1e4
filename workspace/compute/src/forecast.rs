//! Linear trend forecast of closing prices.
//!
//! The model is ordinary least squares of close on trading-day index
//! (`0..n` over the observed samples), projected forward one index per
//! future trading day. Future dates skip weekends.

use chrono::{Datelike, NaiveDate, Weekday};
use common::{PricePoint, PriceSeries};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::{ComputeError, Result};

/// Calendar days of history the forecast is fitted on.
pub const DEFAULT_LOOKBACK_DAYS: u64 = 60;

/// Fitted straight line `close = intercept + slope * index`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendModel {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination of the fit (1.0 for a perfect or flat fit)
    pub r_squared: f64,
    /// Number of observations used for the fit
    pub observations: usize,
}

impl TrendModel {
    /// Fits the trend to `values`, indexed `0..values.len()`.
    pub fn fit(values: &[f64]) -> Result<Self> {
        let n = values.len();
        if n < 2 {
            return Err(ComputeError::InsufficientData(format!(
                "Need at least 2 observations to fit a trend, have {}",
                n
            )));
        }

        let count = n as f64;
        let x_mean = (count - 1.0) / 2.0;
        let y_mean = values.iter().sum::<f64>() / count;

        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for (i, &y) in values.iter().enumerate() {
            let dx = i as f64 - x_mean;
            numerator += dx * (y - y_mean);
            denominator += dx * dx;
        }

        let slope = numerator / denominator;
        let intercept = y_mean - slope * x_mean;

        let (mut ss_res, mut ss_tot) = (0.0, 0.0);
        for (i, &y) in values.iter().enumerate() {
            let fitted = intercept + slope * i as f64;
            ss_res += (y - fitted).powi(2);
            ss_tot += (y - y_mean).powi(2);
        }
        let r_squared = if ss_tot == 0.0 { 1.0 } else { 1.0 - ss_res / ss_tot };

        Ok(Self {
            slope,
            intercept,
            r_squared,
            observations: n,
        })
    }

    /// Value of the line at `index`.
    pub fn predict(&self, index: usize) -> f64 {
        self.intercept + self.slope * index as f64
    }
}

/// One projected close
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Observed history, projected points and the fitted model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    pub ticker: String,
    pub observed: Vec<PricePoint>,
    pub points: Vec<ForecastPoint>,
    pub model: TrendModel,
}

impl ForecastResult {
    pub fn horizon(&self) -> usize {
        self.points.len()
    }
}

/// Returns the `count` weekdays following `after`.
pub fn next_trading_days(after: NaiveDate, count: usize) -> Result<Vec<NaiveDate>> {
    let mut days = Vec::with_capacity(count);
    let mut current = after;

    while days.len() < count {
        current = current
            .succ_opt()
            .ok_or_else(|| ComputeError::Date(format!("No date after {}", current)))?;
        if !matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            days.push(current);
        }
    }

    Ok(days)
}

/// Fits the trend to the closes of `series` and projects `horizon` trading days ahead.
#[instrument(skip(series), fields(ticker = %series.ticker, observed = series.len()))]
pub fn forecast(series: &PriceSeries, horizon: usize) -> Result<ForecastResult> {
    if horizon == 0 {
        return Err(ComputeError::InvalidInput(
            "Forecast horizon must be at least 1".to_string(),
        ));
    }

    let closes = series.closes();
    let model = TrendModel::fit(&closes)?;

    let last_date = series
        .last_date()
        .ok_or_else(|| ComputeError::InsufficientData("Empty price series".to_string()))?;
    let last_index = closes.len() - 1;

    let points = next_trading_days(last_date, horizon)?
        .into_iter()
        .enumerate()
        .map(|(k, date)| ForecastPoint {
            date,
            close: model.predict(last_index + k + 1),
        })
        .collect::<Vec<_>>();

    debug!(slope = model.slope, r_squared = model.r_squared, horizon, "Forecast computed");

    Ok(ForecastResult {
        ticker: series.ticker.clone(),
        observed: series.points.clone(),
        points,
        model,
    })
}

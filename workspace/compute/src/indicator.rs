//! Exponentially weighted moving average of closing prices.

use polars::prelude::*;
use tracing::{debug, instrument};

use crate::error::{ComputeError, Result};
use crate::frame::CLOSE;

/// Span used by the indicator chart.
pub const DEFAULT_EWMA_SPAN: usize = 20;

/// Name of the column `with_ewma` adds for a given span.
pub fn ewma_column(span: usize) -> String {
    format!("ewa_{}", span)
}

/// Options for an unadjusted EWMA with `alpha = 2 / (span + 1)`.
///
/// The first output is the first close, then
/// `out[i] = out[i-1] + alpha * (close[i] - out[i-1])`, so each value only
/// depends on closes at or before its row.
fn ewma_options(span: usize) -> Result<EWMOptions> {
    if span == 0 {
        return Err(ComputeError::InvalidInput(
            "EWMA span must be greater than zero".to_string(),
        ));
    }
    Ok(EWMOptions::default().and_span(span).and_adjust(false))
}

/// Adds the `ewa_{span}` column computed over `close` to the price table.
#[instrument(skip(df), fields(rows = df.height()))]
pub fn with_ewma(mut df: DataFrame, span: usize) -> Result<DataFrame> {
    let options = ewma_options(span)?;
    let closes = df
        .column(CLOSE)
        .map_err(|e| ComputeError::DataFrame(format!("Missing {} column: {}", CLOSE, e)))?
        .as_materialized_series();

    let averaged = ewm_mean(closes, options)?.with_name(ewma_column(span).into());
    debug!(span, "Computed EWMA column");

    df.with_column(averaged)?;
    Ok(df)
}

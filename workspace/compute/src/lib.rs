pub mod charts;
pub mod error;
pub mod forecast;
pub mod frame;
pub mod indicator;
pub mod render;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{ComputeError, Result};
pub use forecast::{DEFAULT_LOOKBACK_DAYS, ForecastPoint, ForecastResult, TrendModel};
pub use indicator::DEFAULT_EWMA_SPAN;
pub use render::{ChartRenderer, PlotlyRenderer};

/// Chart height used by the dashboard panels.
pub const DEFAULT_CHART_HEIGHT: usize = 400;

/// Returns the renderer used by the dashboard most of the time.
pub fn default_renderer() -> PlotlyRenderer {
    PlotlyRenderer::with_height(DEFAULT_CHART_HEIGHT)
}

use common::{ChartSpec, RenderMode};
use plotly::common::{Mode, Title};
use plotly::layout::Axis;
use plotly::{Layout, Plot, Scatter};

use crate::error::Result;

/// Turns a chart spec into a figure the UI layer can draw.
pub trait ChartRenderer: Send + Sync {
    fn render(&self, spec: &ChartSpec) -> Result<serde_json::Value>;
}

/// Renders specs as plotly figures (`{"data": [...], "layout": {...}}`).
#[derive(Debug, Clone, Copy, Default)]
pub struct PlotlyRenderer {
    height: Option<usize>,
}

impl PlotlyRenderer {
    pub fn with_height(height: usize) -> Self {
        Self { height: Some(height) }
    }
}

fn plotly_mode(mode: RenderMode) -> Mode {
    match mode {
        RenderMode::Lines => Mode::Lines,
        RenderMode::LinesMarkers => Mode::LinesMarkers,
    }
}

impl ChartRenderer for PlotlyRenderer {
    fn render(&self, spec: &ChartSpec) -> Result<serde_json::Value> {
        let mut plot = Plot::new();

        for series in &spec.series {
            let dates: Vec<String> = series.x.iter().map(|d| d.to_string()).collect();
            let trace = Scatter::new(dates, series.y.clone())
                .name(&series.name)
                .mode(plotly_mode(series.mode));
            plot.add_trace(trace);
        }

        let mut layout = Layout::new()
            .title(Title::with_text(&spec.title))
            .x_axis(Axis::new().title(Title::with_text(&spec.x_field)))
            .y_axis(Axis::new().title(Title::with_text(&spec.y_field)));
        if let Some(height) = self.height {
            layout = layout.height(height);
        }
        plot.set_layout(layout);

        Ok(serde_json::from_str(&plot.to_json())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{price_chart, NO_DATA_MESSAGE};
    use crate::testing::{dated_series, flat_series};

    #[test]
    fn test_plotly_figure_has_one_trace_per_series() {
        let spec = price_chart(&flat_series(10.0, 3));
        let figure = PlotlyRenderer::default().render(&spec).unwrap();

        let data = figure["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["name"], "Close");
        assert_eq!(data[0]["mode"], "lines");
        assert_eq!(data[0]["x"][0], "2020-01-01");
        assert_eq!(data[1]["y"], serde_json::json!([10.0, 10.0, 10.0]));
    }

    #[test]
    fn test_plotly_layout_carries_title() {
        let spec = price_chart(&flat_series(1.0, 2));
        let figure = PlotlyRenderer::with_height(400).render(&spec).unwrap();

        assert_eq!(figure["layout"]["title"]["text"], spec.title.as_str());
        assert_eq!(figure["layout"]["height"], 400);
    }

    #[test]
    fn test_empty_spec_renders_no_traces() {
        let spec = price_chart(&dated_series(&[]));
        assert_eq!(spec.empty_message.as_deref(), Some(NO_DATA_MESSAGE));

        let figure = PlotlyRenderer::default().render(&spec).unwrap();
        assert!(figure["data"].as_array().unwrap().is_empty());
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// How the points of a series are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    Lines,
    LinesMarkers,
}

/// A single named trace of a chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChartSeries {
    pub name: String,
    pub x: Vec<NaiveDate>,
    pub y: Vec<f64>,
    pub mode: RenderMode,
}

impl ChartSeries {
    pub fn new(name: impl Into<String>, x: Vec<NaiveDate>, y: Vec<f64>, mode: RenderMode) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            mode,
        }
    }
}

/// Renderer-agnostic description of one plot.
///
/// When `empty_message` is set the chart has nothing to draw and the UI
/// shows the message instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChartSpec {
    pub title: String,
    /// Label of the x axis field (always a date)
    pub x_field: String,
    /// Label of the y axis field
    pub y_field: String,
    pub series: Vec<ChartSeries>,
    pub empty_message: Option<String>,
}

impl ChartSpec {
    pub fn new(title: impl Into<String>, x_field: impl Into<String>, y_field: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_field: x_field.into(),
            y_field: y_field.into(),
            series: Vec::new(),
            empty_message: None,
        }
    }

    pub fn with_series(mut self, series: ChartSeries) -> Self {
        self.series.push(series);
        self
    }

    pub fn with_empty_message(mut self, message: impl Into<String>) -> Self {
        self.series.clear();
        self.empty_message = Some(message.into());
        self
    }

    /// Finds a series by name.
    pub fn series_named(&self, name: &str) -> Option<&ChartSeries> {
        self.series.iter().find(|s| s.name == name)
    }
}

/// Chart endpoint payload: the spec and the figure produced by the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChartResponse {
    pub spec: ChartSpec,
    /// Renderer output (plotly figure JSON with `data` and `layout`)
    #[schema(value_type = Object)]
    pub figure: serde_json::Value,
}

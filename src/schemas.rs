use chrono::NaiveDate;
use common::{
    ChartResponse, ChartSeries, ChartSpec, CompanyProfile, DateRange, ErrorResponse, PricePoint,
    PriceSeries, RenderMode,
};
use compute::ChartRenderer;
use market::MarketDataProvider;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use utoipa::{IntoParams, OpenApi, ToSchema};
use validator::Validate;

use crate::config::Settings;

/// Application state shared across handlers.
///
/// Everything in here is read-only; requests do not share mutable state.
#[derive(Clone)]
pub struct AppState {
    /// Market data source
    pub provider: Arc<dyn MarketDataProvider>,
    /// Chart renderer
    pub renderer: Arc<dyn ChartRenderer>,
    /// Loaded settings
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(settings: Settings, provider: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            provider,
            renderer: Arc::new(compute::default_renderer()),
            settings: Arc::new(settings),
        }
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("provider", &self.provider.name())
            .finish_non_exhaustive()
    }
}

/// Query parameters for the company endpoint
#[derive(Debug, Deserialize, Serialize, ToSchema, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct CompanyQuery {
    /// Ticker symbol; the placeholder profile is returned when absent
    #[validate(length(max = 16))]
    pub ticker: Option<String>,
}

/// Query parameters for price history and the price/indicator charts
#[derive(Debug, Deserialize, Serialize, ToSchema, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct PriceQuery {
    /// Ticker symbol
    #[validate(length(max = 16))]
    pub ticker: Option<String>,
    /// First day of the range (YYYY-MM-DD); full history when absent
    pub start_date: Option<NaiveDate>,
    /// Last day of the range (YYYY-MM-DD); defaults to today
    pub end_date: Option<NaiveDate>,
}

/// Query parameters for the forecast chart
#[derive(Debug, Deserialize, Serialize, ToSchema, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct ForecastQuery {
    /// Ticker symbol
    #[validate(length(max = 16))]
    pub ticker: Option<String>,
    /// Number of future trading days to predict
    #[validate(range(min = 1, max = 365))]
    pub days: Option<u32>,
}

/// API response wrapper
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
            success: true,
        }
    }
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Active market data provider
    pub provider: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::company::get_company,
        crate::handlers::prices::get_prices,
        crate::handlers::charts::get_price_chart,
        crate::handlers::charts::get_indicator_chart,
        crate::handlers::charts::get_forecast_chart,
    ),
    components(
        schemas(
            ApiResponse<CompanyProfile>,
            ApiResponse<PriceSeries>,
            ApiResponse<ChartResponse>,
            ErrorResponse,
            HealthResponse,
            CompanyQuery,
            PriceQuery,
            ForecastQuery,
            CompanyProfile,
            PriceSeries,
            PricePoint,
            DateRange,
            ChartResponse,
            ChartSpec,
            ChartSeries,
            RenderMode,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "company", description = "Company metadata endpoints"),
        (name = "prices", description = "Price history endpoints"),
        (name = "charts", description = "Chart endpoints for the dashboard panels"),
    ),
    info(
        title = "Stockcast API",
        description = "Stock dashboard API - company metadata, price charts, EWMA indicator and trend forecasts",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;

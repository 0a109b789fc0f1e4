//! Common transport-layer types shared between backend and frontend.
//! These structs mirror the backend handlers' request/response payloads
//! so the frontend can deserialize API responses without duplicating shapes.

mod charts;
mod prices;

pub use charts::{ChartResponse, ChartSeries, ChartSpec, RenderMode};
pub use prices::{CompanyProfile, DateRange, PricePoint, PriceSeries, Ticker};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Generic API response wrapper used by the backend.
/// Note: The backend has its own definition in stockcast/src/schemas.rs with the
/// same field names. We mirror it here for the frontend to reuse.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success flag
    pub success: bool,
}

/// Error payload returned by the backend for every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ErrorResponse {
    /// Human readable error message
    pub error: String,
    /// Machine readable error class (`missing_input`, `ticker_not_found`, ...)
    pub code: String,
    /// Always false
    pub success: bool,
}

use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use common::ErrorResponse;
use compute::ComputeError;
use market::MarketError;
use thiserror::Error;
use tracing::{error, warn};
use validator::ValidationErrors;

/// Errors surfaced to API clients
#[derive(Error, Debug)]
pub enum ApiError {
    /// A required query parameter is absent or blank
    #[error("Missing required input: {0}")]
    MissingInput(&'static str),

    /// A query parameter is present but unusable
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The market data provider does not know the ticker
    #[error("Ticker not found: {0}")]
    TickerNotFound(String),

    /// The market data provider could not be reached or answered garbage
    #[error("Failed to fetch market data: {0}")]
    FetchFailed(String),

    /// Anything else
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingInput(_) | ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::TickerNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::FetchFailed(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::MissingInput(_) => "missing_input",
            ApiError::InvalidInput(_) => "invalid_input",
            ApiError::TickerNotFound(_) => "ticker_not_found",
            ApiError::FetchFailed(_) => "fetch_failed",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(code = self.code(), "{}", self);
        } else {
            warn!(code = self.code(), "{}", self);
        }

        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
            success: false,
        };
        (status, Json(body)).into_response()
    }
}

impl From<MarketError> for ApiError {
    fn from(error: MarketError) -> Self {
        match error {
            MarketError::TickerNotFound(ticker) => ApiError::TickerNotFound(ticker),
            MarketError::InvalidRange { .. } => ApiError::InvalidInput(error.to_string()),
            MarketError::Network(_)
            | MarketError::Upstream { .. }
            | MarketError::Decode(_)
            | MarketError::Fixture(_) => ApiError::FetchFailed(error.to_string()),
        }
    }
}

impl From<ComputeError> for ApiError {
    fn from(error: ComputeError) -> Self {
        match error {
            ComputeError::InvalidInput(message) => ApiError::InvalidInput(message),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidInput(rejection.body_text())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::InvalidInput(errors.to_string())
    }
}

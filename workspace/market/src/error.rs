use thiserror::Error;

/// Error types for market data lookups
#[derive(Error, Debug)]
pub enum MarketError {
    /// The provider has no record of the ticker
    #[error("Ticker not found: {0}")]
    TickerNotFound(String),

    /// The requested date range is inverted
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    /// The request never produced a response (DNS, connect, timeout)
    #[error("Request failed: {0}")]
    Network(String),

    /// The provider answered with a non-success status
    #[error("Upstream error {status}: {message}")]
    Upstream { status: u16, message: String },

    /// The provider answered but the payload could not be understood
    #[error("Failed to decode provider response: {0}")]
    Decode(String),

    /// Local fixture data could not be loaded
    #[error("Fixture error: {0}")]
    Fixture(String),
}

impl From<reqwest::Error> for MarketError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            MarketError::Decode(error.to_string())
        } else if let Some(status) = error.status() {
            MarketError::Upstream {
                status: status.as_u16(),
                message: error.to_string(),
            }
        } else {
            MarketError::Network(error.to_string())
        }
    }
}

impl From<serde_json::Error> for MarketError {
    fn from(error: serde_json::Error) -> Self {
        MarketError::Decode(error.to_string())
    }
}

impl From<serde_yaml::Error> for MarketError {
    fn from(error: serde_yaml::Error) -> Self {
        MarketError::Fixture(error.to_string())
    }
}

/// Type alias for Result with MarketError
pub type Result<T> = std::result::Result<T, MarketError>;

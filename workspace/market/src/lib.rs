//! Market data access: the provider contract and its implementations.

pub mod error;
pub mod fixture;
pub mod provider;
pub mod yahoo;

pub use error::{MarketError, Result};
pub use fixture::StaticProvider;
pub use provider::{fetch_trailing_window, resolve_range, window_ending, MarketDataProvider};
pub use yahoo::{YahooClient, YahooEndpoints};

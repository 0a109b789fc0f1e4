use async_trait::async_trait;
use common::{CompanyProfile, DateRange, PricePoint, PriceSeries, Ticker};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, instrument};

use crate::error::{MarketError, Result};
use crate::provider::MarketDataProvider;

/// Data known for one ticker
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaticEntry {
    pub profile: Option<CompanyProfile>,
    #[serde(default)]
    pub prices: Vec<PricePoint>,
}

/// In-memory provider serving fixed data.
///
/// Used for offline runs (loaded from a YAML file) and as the provider
/// behind the HTTP tests.
///
/// ```yaml
/// tickers:
///   AAA:
///     profile:
///       name: Triple A Inc.
///       logo_url: https://example.com/aaa.png
///       description: Makes batteries.
///     prices:
///       - { date: 2020-01-02, open: 10.0, close: 10.0 }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaticProvider {
    #[serde(default)]
    tickers: HashMap<String, StaticEntry>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a ticker.
    pub fn with_ticker(
        mut self,
        symbol: &str,
        profile: Option<CompanyProfile>,
        prices: Vec<PricePoint>,
    ) -> Self {
        self.tickers
            .insert(symbol.trim().to_uppercase(), StaticEntry { profile, prices });
        self
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let parsed: StaticProvider = serde_yaml::from_str(yaml)?;
        // Lookups go through normalized tickers
        let tickers = parsed
            .tickers
            .into_iter()
            .map(|(symbol, entry)| (symbol.trim().to_uppercase(), entry))
            .collect();
        Ok(Self { tickers })
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| MarketError::Fixture(format!("{}: {}", path.display(), e)))?;
        let provider = Self::from_yaml_str(&yaml)?;
        info!(path = %path.display(), tickers = provider.tickers.len(), "Loaded static market data");
        Ok(provider)
    }

    fn entry(&self, ticker: &Ticker) -> Result<&StaticEntry> {
        self.tickers
            .get(ticker.as_str())
            .ok_or_else(|| MarketError::TickerNotFound(ticker.to_string()))
    }
}

#[async_trait]
impl MarketDataProvider for StaticProvider {
    fn name(&self) -> &'static str {
        "static"
    }

    #[instrument(skip(self))]
    async fn fetch_history(&self, ticker: &Ticker, range: Option<DateRange>) -> Result<PriceSeries> {
        let entry = self.entry(ticker)?;
        let series = PriceSeries::new(ticker.as_str(), entry.prices.clone());
        debug!(points = series.len(), "Serving static history");

        Ok(match range {
            Some(range) => series.within(range),
            None => series,
        })
    }

    #[instrument(skip(self))]
    async fn fetch_profile(&self, ticker: &Ticker) -> Result<CompanyProfile> {
        let entry = self.entry(ticker)?;
        Ok(entry.profile.clone().unwrap_or_else(|| CompanyProfile {
            name: ticker.to_string(),
            logo_url: None,
            description: String::new(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const FIXTURE: &str = r#"
tickers:
  aaa:
    profile:
      name: Triple A Inc.
      logo_url: https://example.com/aaa.png
      description: Makes batteries.
    prices:
      - { date: 2020-01-03, open: 11.0, close: 12.0 }
      - { date: 2020-01-02, open: 10.0, close: 10.5 }
  BBB:
    prices: []
"#;

    fn ticker(symbol: &str) -> Ticker {
        Ticker::parse(symbol).unwrap()
    }

    #[tokio::test]
    async fn test_yaml_fixture_roundtrip() {
        let provider = StaticProvider::from_yaml_str(FIXTURE).unwrap();

        let profile = provider.fetch_profile(&ticker("AAA")).await.unwrap();
        assert_eq!(profile.name, "Triple A Inc.");

        let series = provider.fetch_history(&ticker("aaa"), None).await.unwrap();
        assert_eq!(series.closes(), vec![10.5, 12.0]);
    }

    #[tokio::test]
    async fn test_history_respects_range() {
        let provider = StaticProvider::from_yaml_str(FIXTURE).unwrap();
        let day = NaiveDate::from_ymd_opt(2020, 1, 3).unwrap();

        let series = provider
            .fetch_history(&ticker("AAA"), Some(DateRange::new(day, day)))
            .await
            .unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.points[0].open, 11.0);
    }

    #[tokio::test]
    async fn test_unknown_ticker_is_not_found() {
        let provider = StaticProvider::new();
        let result = provider.fetch_history(&ticker("ZZZ"), None).await;
        assert!(matches!(result, Err(MarketError::TickerNotFound(_))));
    }

    #[tokio::test]
    async fn test_profile_falls_back_to_symbol() {
        let provider = StaticProvider::from_yaml_str(FIXTURE).unwrap();
        let profile = provider.fetch_profile(&ticker("BBB")).await.unwrap();
        assert_eq!(profile.name, "BBB");
        assert_eq!(profile.logo_url, None);
    }

    #[test]
    fn test_bad_yaml_is_fixture_error() {
        let result = StaticProvider::from_yaml_str("tickers: [1, 2");
        assert!(matches!(result, Err(MarketError::Fixture(_))));
    }
}

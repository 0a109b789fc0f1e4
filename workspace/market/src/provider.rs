use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use common::{CompanyProfile, DateRange, PriceSeries, Ticker};
use tracing::debug;

use crate::error::{MarketError, Result};

/// Source of price history and company metadata.
///
/// Implementations fetch fresh data on every call; nothing is cached.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Short identifier used in logs and the health endpoint.
    fn name(&self) -> &'static str;

    /// Daily history for `ticker`.
    ///
    /// `range` of `None` requests the full available history.
    async fn fetch_history(&self, ticker: &Ticker, range: Option<DateRange>) -> Result<PriceSeries>;

    /// Company metadata for `ticker`.
    async fn fetch_profile(&self, ticker: &Ticker) -> Result<CompanyProfile>;
}

/// Turns the optional start/end pair coming from the date pickers into a range.
///
/// Without a start date the whole history is requested and `end` is ignored.
/// A start date without an end date runs until `today`.
pub fn resolve_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<Option<DateRange>> {
    let Some(start) = start else {
        return Ok(None);
    };
    let end = end.unwrap_or(today);

    if start > end {
        return Err(MarketError::InvalidRange { start, end });
    }

    Ok(Some(DateRange::new(start, end)))
}

/// The `days` calendar days up to and including `end`.
pub fn window_ending(end: NaiveDate, days: u64) -> DateRange {
    let start = end.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN);
    DateRange::new(start, end)
}

/// History a trend is fitted on: `lookback_days` calendar days ending at the
/// latest session the provider has.
///
/// The window ending `today` is fetched first. When it holds fewer than two
/// sessions (a fixture, or a ticker that stopped trading) the full history is
/// fetched and the window is anchored at its last session instead.
pub async fn fetch_trailing_window(
    provider: &dyn MarketDataProvider,
    ticker: &Ticker,
    lookback_days: u64,
    today: NaiveDate,
) -> Result<PriceSeries> {
    let recent = provider
        .fetch_history(ticker, Some(window_ending(today, lookback_days)))
        .await?;
    if recent.len() >= 2 {
        return Ok(recent);
    }

    let history = provider.fetch_history(ticker, None).await?;
    let Some(last) = history.last_date() else {
        return Ok(history);
    };
    let window = window_ending(last, lookback_days);
    debug!(%ticker, ?window, "Anchoring trailing window at the latest session");
    Ok(history.within(window))
}

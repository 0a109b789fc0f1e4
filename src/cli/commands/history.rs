use anyhow::Result;
use chrono::{NaiveDate, Utc};
use tracing::{debug, warn};

use super::parse_ticker;
use crate::config::{Settings, build_provider};

pub async fn history(
    settings: Settings,
    ticker: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<()> {
    let ticker = parse_ticker(ticker)?;
    let range = market::resolve_range(start, end, Utc::now().date_naive())?;
    let provider = build_provider(&settings)?;
    debug!(%ticker, ?range, provider = provider.name(), "Fetching price history");

    let series = provider.fetch_history(&ticker, range).await?;
    if series.is_empty() {
        warn!(%ticker, "No price data in the requested range");
    }

    println!("{}", serde_json::to_string_pretty(&series)?);
    Ok(())
}

use anyhow::Result;
use chrono::Utc;
use tracing::{debug, info};

use super::parse_ticker;
use crate::config::{Settings, build_provider};

pub async fn forecast(settings: Settings, ticker: &str, days: usize) -> Result<()> {
    let ticker = parse_ticker(ticker)?;
    let provider = build_provider(&settings)?;

    debug!(%ticker, lookback_days = settings.lookback_days, "Fetching forecast window");
    let history = market::fetch_trailing_window(
        provider.as_ref(),
        &ticker,
        settings.lookback_days,
        Utc::now().date_naive(),
    )
    .await?;
    let result = compute::forecast::forecast(&history, days)?;
    info!(
        slope = result.model.slope,
        r_squared = result.model.r_squared,
        observations = result.model.observations,
        "Trend fitted"
    );

    let output = serde_json::json!({
        "ticker": result.ticker,
        "model": result.model,
        "points": result.points,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

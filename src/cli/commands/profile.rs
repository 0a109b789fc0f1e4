use anyhow::Result;
use tracing::debug;

use super::parse_ticker;
use crate::config::{Settings, build_provider};

pub async fn profile(settings: Settings, ticker: &str) -> Result<()> {
    let ticker = parse_ticker(ticker)?;
    let provider = build_provider(&settings)?;
    debug!(%ticker, provider = provider.name(), "Fetching company profile");

    let profile = provider.fetch_profile(&ticker).await?;

    println!("{}", serde_json::to_string_pretty(&profile)?);
    Ok(())
}

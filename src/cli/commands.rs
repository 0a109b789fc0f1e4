pub mod forecast;
pub mod history;
pub mod profile;
pub mod serve;

pub use forecast::forecast;
pub use history::history;
pub use profile::profile;
pub use serve::serve;

use anyhow::{Context, Result};
use common::Ticker;

fn parse_ticker(input: &str) -> Result<Ticker> {
    Ticker::parse(input).with_context(|| format!("Invalid ticker: {:?}", input))
}

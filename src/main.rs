use anyhow::Result;
use clap::Parser;

mod cli;
mod config;
mod error;
mod handlers;
mod helpers;
mod router;
mod schemas;
mod tests;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run().await
}

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

use crate::config::{ProviderKind, Settings, init_tracing};
use commands::{forecast, history, profile, serve};

#[derive(Parser)]
#[command(name = "stockcast")]
#[command(about = "Stock dashboard server with price, indicator and forecast charts")]
#[command(version)]
pub struct Cli {
    /// Path to a configuration file (YAML, TOML or JSON)
    ///
    /// Without it `stockcast.{yaml,toml,json}` in the working directory is
    /// used when present.
    #[arg(short, long, global = true, env = "STOCKCAST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Market data provider, overriding the configuration
    #[arg(short, long, global = true, value_enum)]
    pub provider: Option<ProviderKind>,

    /// YAML fixture for the static provider
    #[arg(long, global = true)]
    pub static_data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Bind address for the web server
        ///
        /// Format: IP:PORT (e.g., 0.0.0.0:3000, 127.0.0.1:8080)
        #[arg(short, long, env = "BIND_ADDRESS")]
        bind_address: Option<String>,

        /// Verbose logging for the server and the market client
        #[arg(short, long)]
        debug: bool,

        /// Directory with the built frontend to serve at `/`
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
    /// Print the company profile of a ticker
    Profile {
        /// Ticker symbol, e.g. MSFT
        #[arg(short, long)]
        ticker: String,
    },
    /// Print daily open/close prices of a ticker
    ///
    /// Without --start the full history is printed.
    History {
        /// Ticker symbol, e.g. MSFT
        #[arg(short, long)]
        ticker: String,

        /// First day (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Last day (YYYY-MM-DD), defaults to today
        #[arg(long)]
        end: Option<NaiveDate>,
    },
    /// Print the projected closing prices of a ticker
    Forecast {
        /// Ticker symbol, e.g. MSFT
        #[arg(short, long)]
        ticker: String,

        /// Number of trading days to project
        #[arg(short = 'n', long, default_value_t = 5)]
        days: usize,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let mut settings = Settings::read(self.config.as_deref())?;
        if let Some(provider) = self.provider {
            settings.provider = provider;
        }
        if self.static_data.is_some() {
            settings.static_data = self.static_data;
        }
        if let Commands::Serve { bind_address, debug, static_dir } = &self.command {
            if let Some(bind_address) = bind_address {
                settings.bind_address = bind_address.clone();
            }
            settings.debug |= *debug;
            if static_dir.is_some() {
                settings.static_dir = static_dir.clone();
            }
        }
        settings.validate()?;

        init_tracing(&settings);

        match self.command {
            Commands::Serve { .. } => {
                serve(settings).await?;
            }
            Commands::Profile { ticker } => {
                profile(settings, &ticker).await?;
            }
            Commands::History { ticker, start, end } => {
                history(settings, &ticker, start, end).await?;
            }
            Commands::Forecast { ticker, days } => {
                forecast(settings, &ticker, days).await?;
            }
        }
        Ok(())
    }
}

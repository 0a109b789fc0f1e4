use anyhow::{Context, Result};
use clap::ValueEnum;
use config::{Config, Environment, File};
use market::{MarketDataProvider, StaticProvider, YahooClient, YahooEndpoints};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::schemas::AppState;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
const DEFAULT_LOG_FILTER: &str = "stockcast=info,tower_http=info";
const DEBUG_LOG_FILTER: &str = "stockcast=debug,market=debug,compute=debug,tower_http=debug,axum::rejection=trace";

/// Which market data source backs the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Live data from Yahoo Finance
    Yahoo,
    /// Fixed data loaded from a YAML file
    Static,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YahooSettings {
    pub chart_url: String,
    pub summary_url: String,
    pub cookie_url: String,
    pub crumb_url: String,
}

impl YahooSettings {
    pub fn endpoints(&self) -> YahooEndpoints {
        YahooEndpoints {
            chart_url: self.chart_url.clone(),
            summary_url: self.summary_url.clone(),
            cookie_url: self.cookie_url.clone(),
            crumb_url: self.crumb_url.clone(),
        }
    }
}

/// Application settings.
///
/// Layered lowest to highest: built-in defaults, optional config file,
/// `STOCKCAST_*` environment variables, then CLI flags.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub bind_address: String,
    pub debug: bool,
    pub log_filter: Option<String>,
    pub provider: ProviderKind,
    pub static_data: Option<PathBuf>,
    pub yahoo: YahooSettings,
    pub request_timeout_secs: u64,
    pub lookback_days: u64,
    pub ewma_span: usize,
    /// Directory with the built frontend, served at `/`
    pub static_dir: Option<PathBuf>,
}

impl Settings {
    /// Load and validate settings from defaults, an optional file and the environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let settings = Self::read(config_path)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings without validating them, so CLI flags can still fill gaps.
    ///
    /// Without an explicit path a `stockcast.{yaml,toml,json}` in the working
    /// directory is picked up if present.
    pub fn read(config_path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut builder = Config::builder()
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)?
            .set_default("debug", false)?
            .set_default("provider", "yahoo")?
            .set_default("yahoo.chart_url", YahooClient::DEFAULT_CHART_URL)?
            .set_default("yahoo.summary_url", YahooClient::DEFAULT_SUMMARY_URL)?
            .set_default("yahoo.cookie_url", YahooClient::DEFAULT_COOKIE_URL)?
            .set_default("yahoo.crumb_url", YahooClient::DEFAULT_CRUMB_URL)?
            .set_default("request_timeout_secs", 30_i64)?
            .set_default("lookback_days", compute::DEFAULT_LOOKBACK_DAYS as i64)?
            .set_default("ewma_span", compute::DEFAULT_EWMA_SPAN as i64)?;

        builder = match config_path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name("stockcast").required(false)),
        };

        builder
            .add_source(
                Environment::with_prefix("STOCKCAST")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.ewma_span > 0, "ewma_span must be greater than zero");
        anyhow::ensure!(self.lookback_days > 0, "lookback_days must be greater than zero");
        anyhow::ensure!(self.request_timeout_secs > 0, "request_timeout_secs must be greater than zero");
        if self.provider == ProviderKind::Static {
            anyhow::ensure!(
                self.static_data.is_some(),
                "the static provider needs `static_data` pointing at a YAML fixture"
            );
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Tracing filter used when `RUST_LOG` is not set.
    pub fn log_filter(&self) -> String {
        match (&self.log_filter, self.debug) {
            (Some(filter), _) => filter.clone(),
            (None, true) => DEBUG_LOG_FILTER.to_string(),
            (None, false) => DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

/// Build the market data provider selected by the settings
pub fn build_provider(settings: &Settings) -> Result<Arc<dyn MarketDataProvider>> {
    match settings.provider {
        ProviderKind::Yahoo => {
            tracing::info!("Using Yahoo Finance market data");
            let client = YahooClient::with_endpoints(settings.yahoo.endpoints(), settings.request_timeout())?;
            Ok(Arc::new(client))
        }
        ProviderKind::Static => {
            let path = settings
                .static_data
                .as_ref()
                .context("static provider selected without `static_data`")?;
            tracing::info!("Using static market data from {}", path.display());
            Ok(Arc::new(StaticProvider::from_yaml_file(path)?))
        }
    }
}

/// Initialize application state from settings
pub fn initialize_app_state(settings: Settings) -> Result<AppState> {
    let provider = build_provider(&settings)?;
    Ok(AppState::new(settings, provider))
}

/// Install the global tracing subscriber; `RUST_LOG` wins over the settings.
pub fn init_tracing(settings: &Settings) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| settings.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

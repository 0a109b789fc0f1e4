use log::Level;
use web_sys::window;

/// Global application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    /// Backend API origin (e.g., "http://localhost:3000"); empty means same origin
    pub api_origin: String,

    /// API path prefix (e.g., "/api/v1")
    pub api_path: String,

    /// Default log level for the application
    pub log_level: Level,

    /// Initial value of the forecast day count box
    pub default_forecast_days: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_origin: String::new(),
            api_path: "/api/v1".to_string(),
            log_level: Level::Info,
            default_forecast_days: 5,
        }
    }
}

impl AppSettings {
    /// Create settings from window location and localStorage overrides
    pub fn from_environment() -> Self {
        let mut settings = Self::default();

        let Some(window) = window() else {
            return settings;
        };

        if let Ok(hostname) = window.location().hostname() {
            // In development, use more verbose logging
            if hostname == "localhost" || hostname == "127.0.0.1" {
                settings.log_level = Level::Debug;
            }
        }

        if let Ok(Some(storage)) = window.local_storage() {
            if let Ok(Some(api_origin)) = storage.get_item("stockcast_api_origin") {
                settings.api_origin = api_origin.trim_end_matches('/').to_string();
            }

            if let Ok(Some(api_path)) = storage.get_item("stockcast_api_path") {
                settings.api_path = api_path;
            }

            if let Ok(Some(log_level)) = storage.get_item("stockcast_log_level") {
                settings.log_level = match log_level.to_lowercase().as_str() {
                    "error" => Level::Error,
                    "warn" => Level::Warn,
                    "info" => Level::Info,
                    "debug" => Level::Debug,
                    "trace" => Level::Trace,
                    _ => settings.log_level,
                };
            }

            if let Ok(Some(days)) = storage.get_item("stockcast_forecast_days") {
                if let Ok(days) = days.parse::<u32>() {
                    settings.default_forecast_days = days.max(1);
                }
            }
        }

        settings
    }

    /// Get the base API URL (origin + path prefix)
    pub fn api_base_url(&self) -> String {
        format!("{}{}", self.api_origin, self.api_path)
    }
}

// Global settings instance using thread_local
use std::cell::RefCell;

thread_local! {
    static SETTINGS: RefCell<AppSettings> = RefCell::new(AppSettings::from_environment());
}

/// Get a copy of the current settings
pub fn get_settings() -> AppSettings {
    SETTINGS.with(|s| s.borrow().clone())
}

/// Initialize settings (call this at app startup)
pub fn init_settings() {
    SETTINGS.with(|s| {
        *s.borrow_mut() = AppSettings::from_environment();
    });
}

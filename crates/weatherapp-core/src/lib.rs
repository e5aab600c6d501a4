pub mod app;
pub mod config;
pub mod error;
pub mod prefs;

pub use app::App;
pub use config::{
    Config, PreferencesConfig, RetrySettings, TemperatureUnit, ValidationResult, WeatherConfig,
};
pub use error::{AppError, ConfigError, NetworkError, ReqwestErrorExt, StorageError};
pub use prefs::{FilePreferences, KeyValueStore, MemoryPreferences, DEFAULT_NAMESPACE};

use anyhow::Result;

/// Initialize the core application
pub fn init() -> Result<()> {
    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    tracing::info!("WeatherApp core initialized");
    Ok(())
}

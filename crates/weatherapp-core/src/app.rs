use std::sync::Arc;

use crate::prefs::{FilePreferences, KeyValueStore, MemoryPreferences};
use crate::error::{AppError, ConfigError};
use crate::Config;

/// Application lifecycle: owns the validated config and hands out the
/// collaborators that depend on it.
pub struct App {
    config: Arc<Config>,
}

impl App {
    /// Create a new application instance from the on-disk config
    pub fn new() -> Result<Self, AppError> {
        let (config, _) = Config::load_validated().map_err(|e| {
            // Surface typed config failures so the UI can pick a message
            match e.downcast::<ConfigError>() {
                Ok(config_err) => AppError::Config(config_err),
                Err(other) => AppError::Other(other),
            }
        })?;
        Ok(Self::from_config(config))
    }

    /// Create an application around an already loaded config
    pub fn from_config(config: Config) -> Self {
        tracing::info!("Using config directory {:?}", config.config_dir);
        Self {
            config: Arc::new(config),
        }
    }

    /// Open the preference store for the configured namespace.
    ///
    /// Falls back to an in-memory store when the file store is unavailable,
    /// so the caller always gets a usable handle.
    pub fn open_preferences(&self) -> Arc<dyn KeyValueStore> {
        let dir = self.config.preferences_dir();
        let namespace = &self.config.preferences.namespace;

        match FilePreferences::open(&dir, namespace) {
            Ok(prefs) => {
                tracing::info!("Preferences stored at {:?}", prefs.path());
                Arc::new(prefs)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to open preferences in {:?}, using memory store: {}",
                    dir,
                    e
                );
                Arc::new(MemoryPreferences::new())
            }
        }
    }

    /// Shutdown the application
    pub fn shutdown(&self) {
        tracing::info!("Shutting down application");
    }

    /// Get reference to application config
    pub fn config(&self) -> &Config {
        &self.config
    }
}

use anyhow::Result;
use std::sync::Arc;

use crate::Config;

/// Application configuration and lifecycle
pub struct App {
    config: Arc<Config>,
}

impl App {
    /// Create a new application instance from the on-disk configuration
    pub fn new() -> Result<Self> {
        let (config, _) = Config::load_validated()?;
        Ok(Self::with_config(config))
    }

    /// Create an application around an already loaded configuration
    pub fn with_config(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Prepare the directories the app writes to
    pub fn initialize(&mut self) -> Result<()> {
        tracing::info!(
            data_dir = %self.config.storage.data_dir.display(),
            cache_tag = %self.config.offline.cache_tag,
            "Initializing application"
        );

        std::fs::create_dir_all(&self.config.storage.data_dir)?;
        std::fs::create_dir_all(&self.config.offline.cache_dir)?;

        tracing::info!("Application initialized successfully");
        Ok(())
    }

    pub fn shutdown(&mut self) -> Result<()> {
        tracing::info!("Shutting down application");
        Ok(())
    }

    /// Get reference to application config
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shared handle to the config
    pub fn shared_config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }
}

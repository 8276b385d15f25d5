use std::env;
use std::path::Path;

use tokio::fs;
use tracing::{info, warn};

use crate::types::MirrorError;

use super::{paths, Config, ADDRESS_ENV};

impl Config {
    /// Load configuration from config.json and the environment.
    /// Falls back to defaults if the file doesn't exist or can't be parsed
    pub async fn load() -> Self {
        let config_path = paths::get_config_path();
        let mut config = match Self::load_from(&config_path).await {
            Ok(config) => {
                info!(
                    path = %config_path.display(),
                    address = %config.server_address,
                    "Loaded configuration"
                );
                config
            }
            Err(err) => {
                warn!(error = ?err, "Failed to load config.json, using defaults");
                Self::default()
            }
        };

        if let Ok(custom) = env::var(ADDRESS_ENV) {
            let trimmed = custom.trim();
            if !trimmed.is_empty() {
                config.server_address = trimmed.to_string();
            }
        }

        config
    }

    pub async fn load_from(config_path: &Path) -> Result<Self, MirrorError> {
        if !config_path.exists() {
            warn!(path = %config_path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(config_path)
            .await
            .map_err(|err| MirrorError::Config(format!("Failed to read config file: {err}")))?;

        serde_json::from_str(&contents)
            .map_err(|err| MirrorError::Config(format!("Failed to parse config.json: {err}")))
    }
}

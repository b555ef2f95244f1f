use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ConfigError;

pub const DEFAULT_EXCERPT_LEN: usize = 200;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub repo_owner: String,
    pub repo_name: String,
    pub api_base: String,
    pub user_agent: String,
    /// Path of the flat key-value state file.
    pub state_path: PathBuf,
    pub excerpt_length: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            repo_owner: "jarvis-clawdbot".to_string(),
            repo_name: "jarvis-daily-log".to_string(),
            api_base: "https://api.github.com".to_string(),
            user_agent: "daylog/0.1".to_string(),
            state_path: PathBuf::from("daylog-state.json"),
            excerpt_length: DEFAULT_EXCERPT_LEN,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let raw = fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        let config: AppConfig = toml::from_str(&raw)?;
        config.validate()?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Missing config file is a normal first-run state, not an error.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(ConfigError::FileNotFound { .. }) => {
                debug!(path = %path.display(), "no config file, using defaults");
                Self::default()
            }
            Err(e) => {
                warn!("invalid config file, using defaults: {}", e);
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.repo_owner.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "repo_owner".to_string(),
                value: self.repo_owner.clone(),
            });
        }
        if self.repo_name.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "repo_name".to_string(),
                value: self.repo_name.clone(),
            });
        }
        if self.excerpt_length == 0 {
            return Err(ConfigError::InvalidValue {
                field: "excerpt_length".to_string(),
                value: self.excerpt_length.to_string(),
            });
        }
        Ok(())
    }
}

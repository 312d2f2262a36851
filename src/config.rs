use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;

/// Environment variable holding the movie API key.
pub const API_KEY_ENV: &str = "OMDB_API_KEY";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default = "default_initial_query")]
    pub initial_query: String,
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: None,
            data_dir: None,
            initial_query: default_initial_query(),
            storage_key: default_storage_key(),
        }
    }
}

fn default_api_url() -> String {
    "https://www.omdbapi.com/".to_string()
}

fn default_initial_query() -> String {
    "interstellar".to_string()
}

fn default_storage_key() -> String {
    "watched".to_string()
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.to_string(), e))?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(path.to_string(), e))?;

        Ok(config)
    }

    /// Defaults, then the optional file, then the environment.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            config.set_api_key(key);
        }
        Ok(config)
    }

    /// Blank keys are ignored so a stray empty variable doesn't hide the prompt.
    pub fn set_api_key(&mut self, key: String) {
        let key = key.trim();
        if !key.is_empty() {
            self.api_key = Some(key.to_string());
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        if let Some(ref dir) = self.data_dir {
            return dir.clone();
        }

        dirs::data_dir()
            .map(|dir| dir.join("popcorn"))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

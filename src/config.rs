use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::constants::{DEFAULT_ENDPOINT, DEFAULT_GREETING_DELAY_MS, DEFAULT_TYPING_LINGER_MS};
use crate::errors::{BalcaoError, BalcaoResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub endpoint: String,
    pub greeting_delay_ms: u64,
    pub typing_linger_ms: u64,
    pub quick_replies: Vec<String>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            greeting_delay_ms: DEFAULT_GREETING_DELAY_MS,
            typing_linger_ms: DEFAULT_TYPING_LINGER_MS,
            quick_replies: vec![
                "Horário de atendimento".to_string(),
                "Falar sobre um pedido".to_string(),
                "Como funciona a garantia?".to_string(),
            ],
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Loads the config file from `~/.config/balcao/config.json`, creating
    /// it with defaults on first run. `BALCAO_ENDPOINT` overrides the
    /// endpoint afterwards.
    pub fn load() -> BalcaoResult<Self> {
        let config_path = default_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> BalcaoResult<Self> {
        let mut config = if config_path.exists() {
            let config_str = fs::read_to_string(config_path).map_err(|e| {
                BalcaoError::config_error(format!("failed to read config file: {}", e))
            })?;

            serde_json::from_str(&config_str)
                .map_err(|e| BalcaoError::config_error(format!("failed to parse config: {}", e)))?
        } else {
            let config = Config::default();

            if let Some(parent) = config_path.parent() {
                fs::create_dir_all(parent).map_err(|e| {
                    BalcaoError::config_error(format!("failed to create config directory: {}", e))
                })?;
            }

            let config_str = serde_json::to_string_pretty(&config).map_err(|e| {
                BalcaoError::config_error(format!("failed to serialize config: {}", e))
            })?;

            fs::write(config_path, config_str).map_err(|e| {
                BalcaoError::config_error(format!("failed to write config file: {}", e))
            })?;

            config
        };

        if let Ok(endpoint) = env::var("BALCAO_ENDPOINT") {
            config.endpoint = endpoint;
        }

        validate_config(&config)?;
        Ok(config)
    }
}

fn default_config_path() -> BalcaoResult<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| BalcaoError::config_error("could not determine home directory"))?;

    Ok(home_dir.join(".config").join("balcao").join("config.json"))
}

pub fn validate_config(config: &Config) -> BalcaoResult<()> {
    if config.endpoint.is_empty() {
        return Err(BalcaoError::config_error("endpoint is required"));
    }

    if !config.endpoint.starts_with("http://") && !config.endpoint.starts_with("https://") {
        return Err(BalcaoError::config_error(
            "endpoint must be an http(s) URL",
        ));
    }

    if config.log_level.is_empty() {
        return Err(BalcaoError::config_error("log_level is required"));
    }

    Ok(())
}

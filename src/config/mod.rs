mod types;

pub use types::*;

use crate::{Error, Result};
use std::env;
use tracing::debug;

pub async fn load() -> Result<Config> {
    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

    let mut config = load_from(&config_path).await?;

    if let Ok(api_key) = env::var("LLM_API_KEY") {
        debug!("Using LLM API key from environment");
        config.llm.api_key = api_key;
    }

    config.validate()?;
    Ok(config)
}

/// Reads and parses a config file without applying environment overrides
/// or validation.
pub async fn load_from(config_path: &str) -> Result<Config> {
    debug!("Loading configuration from: {}", config_path);

    let config_str = tokio::fs::read_to_string(config_path).await?;
    parse(&config_str)
}

pub fn parse(yaml: &str) -> Result<Config> {
    Ok(serde_yaml::from_str(yaml)?)
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.llm.model.trim().is_empty() {
            return Err(Error::config("llm.model must not be empty"));
        }
        if self.llm.api_key.trim().is_empty() {
            return Err(Error::config(
                "llm.api_key is not set (configure it or export LLM_API_KEY)",
            ));
        }
        let p = self.simulation.presence_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(Error::config(format!(
                "simulation.presence_probability must lie in [0, 1], got {p}"
            )));
        }
        Ok(())
    }
}

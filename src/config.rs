//! CLI configuration: file loading plus environment overrides

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use locator_engine::EngineConfig;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{info, warn};

/// Directory under the platform config dir holding `config.yaml`
pub const CONFIG_DIR_NAME: &str = "locator-forge";

/// Overrides `engine.cache_capacity`
pub const ENV_CACHE_CAPACITY: &str = "LOCATOR_FORGE_CACHE_CAPACITY";

/// Overrides `engine.batch_workers`
pub const ENV_BATCH_WORKERS: &str = "LOCATOR_FORGE_BATCH_WORKERS";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Locator engine tunables
    pub engine: EngineConfig,
}

/// `<config dir>/locator-forge/config.yaml`
pub fn default_config_path() -> Result<PathBuf> {
    let mut path = dirs::config_dir().context("Failed to get config directory")?;
    path.push(CONFIG_DIR_NAME);
    path.push("config.yaml");
    Ok(path)
}

/// Load configuration from `config_path` or the default location.
///
/// A missing file is not an error; defaults are used with a warning.
pub async fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config_path = match config_path {
        Some(path) => path.to_path_buf(),
        None => default_config_path()?,
    };

    if config_path.exists() {
        let content = fs::read_to_string(&config_path)
            .await
            .context("Failed to read config file")?;

        let config: Config =
            serde_yaml::from_str(&content).context("Failed to parse config file")?;

        info!("Loaded configuration from: {}", config_path.display());
        Ok(config)
    } else {
        warn!(
            "Config file not found, using defaults: {}",
            config_path.display()
        );
        Ok(Config::default())
    }
}

/// Apply `LOCATOR_FORGE_*` environment overrides on top of file values
pub fn apply_env_overrides(config: &mut Config) -> Result<()> {
    if let Some(capacity) = env_usize(ENV_CACHE_CAPACITY)? {
        info!("Cache capacity from {}: {}", ENV_CACHE_CAPACITY, capacity);
        config.engine.cache_capacity = capacity;
    }
    if let Some(workers) = env_usize(ENV_BATCH_WORKERS)? {
        info!("Batch workers from {}: {}", ENV_BATCH_WORKERS, workers);
        config.engine.batch_workers = workers;
    }
    Ok(())
}

fn env_usize(key: &str) -> Result<Option<usize>> {
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<usize>()
            .map(Some)
            .with_context(|| format!("{} must be a non-negative integer, got '{}'", key, raw)),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use locator_engine::Framework;

    #[test]
    fn test_yaml_config_fills_defaults() {
        let config: Config = serde_yaml::from_str(
            "engine:\n  cache_capacity: 32\n  default_framework: playwright\n",
        )
        .unwrap();
        assert_eq!(config.engine.cache_capacity, 32);
        assert_eq!(config.engine.default_framework, Framework::Playwright);
        assert_eq!(config.engine.max_fallbacks, 3);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[tokio::test]
    async fn test_missing_file_falls_back_to_defaults() {
        let config = load_config(Some(Path::new("/nonexistent/locator-forge.yaml")))
            .await
            .unwrap();
        assert_eq!(config, Config::default());
    }
}

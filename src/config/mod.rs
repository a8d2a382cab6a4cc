pub mod types;

use std::path::Path;

use crate::error::{RegistryError, Result};
use types::Config;

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        tracing::info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        RegistryError::Config(format!(
            "failed to read config file {}: {e}",
            path.display()
        ))
    })?;
    if content.trim().is_empty() {
        return Ok(Config::default());
    }
    let config: Config = serde_yml::from_str(&content)?;
    Ok(config)
}

/// Overlay `API_KEY`, `PORT` and `INTERNAL_PORT` on top of a loaded config.
///
/// `lookup` is normally `|name| std::env::var(name).ok()`.
pub fn apply_env_overrides(
    mut config: Config,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Config> {
    if let Some(key) = lookup("API_KEY") {
        config.auth.api_key = key;
    }
    if let Some(port) = lookup("PORT") {
        config.server.port = parse_port("PORT", &port)?;
    }
    if let Some(port) = lookup("INTERNAL_PORT") {
        config.server.internal_port = Some(parse_port("INTERNAL_PORT", &port)?);
    }
    Ok(config)
}

fn parse_port(name: &str, value: &str) -> Result<u16> {
    value
        .trim()
        .parse()
        .map_err(|e| RegistryError::Config(format!("{name}={value:?} is not a valid port: {e}")))
}

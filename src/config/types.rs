use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, Result};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.auth.api_key.trim().is_empty() {
            return Err(RegistryError::Config(
                "api key is empty; set auth.api_key or the API_KEY environment variable".into(),
            ));
        }
        if self.registry.stale_window_secs == 0 {
            return Err(RegistryError::Config(
                "registry.stale_window_secs must be greater than zero".into(),
            ));
        }
        if self.registry.eviction_interval_secs == 0 {
            return Err(RegistryError::Config(
                "registry.eviction_interval_secs must be greater than zero".into(),
            ));
        }
        if self.registry.snapshot_refresh_secs == 0 {
            return Err(RegistryError::Config(
                "registry.snapshot_refresh_secs must be greater than zero".into(),
            ));
        }
        if self.server.internal_port == Some(self.server.port) {
            return Err(RegistryError::Config(format!(
                "server.internal_port must differ from server.port ({})",
                self.server.port
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Second listener with identical routes, for traffic that should not
    /// leave the private network.
    #[serde(default)]
    pub internal_port: Option<u16>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            internal_port: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AuthConfig {
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegistryConfig {
    #[serde(default = "default_stale_window")]
    pub stale_window_secs: u64,
    #[serde(default = "default_stale_window")]
    pub eviction_interval_secs: u64,
    #[serde(default = "default_snapshot_refresh")]
    pub snapshot_refresh_secs: u64,
}

impl RegistryConfig {
    pub fn stale_window(&self) -> Duration {
        Duration::from_secs(self.stale_window_secs)
    }

    pub fn eviction_interval(&self) -> Duration {
        Duration::from_secs(self.eviction_interval_secs)
    }

    pub fn snapshot_refresh(&self) -> Duration {
        Duration::from_secs(self.snapshot_refresh_secs)
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            stale_window_secs: default_stale_window(),
            eviction_interval_secs: default_stale_window(),
            snapshot_refresh_secs: default_snapshot_refresh(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    80
}

fn default_stale_window() -> u64 {
    1200 // 20 minutes
}

fn default_snapshot_refresh() -> u64 {
    25
}

use config::{Config, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod validator;
pub mod watcher;

use crate::cli::Cli;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub relay: RelaySettings,
    #[serde(default)]
    pub rate_limit: Option<RateLimitConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Where saved segments are forwarded to.
///
/// The webhook URL stays server-side; the browser only ever talks to
/// `/api/save-segment`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RelaySettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(default = "default_relay_timeout")]
    pub timeout_seconds: u64,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_seconds: default_relay_timeout(),
        }
    }
}

fn default_relay_timeout() -> u64 {
    10
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub requests_per_second: u32,
    pub burst_size: u32,
}

impl Settings {
    pub fn new() -> Result<Self, anyhow::Error> {
        Self::from_root(".")
    }

    /// Create settings from CLI arguments (includes config file and CLI overrides)
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let mut settings = Self::load(File::from(cli.config.clone()).required(false))?;

        // Apply CLI overrides (CLI > env vars > config file)
        settings.apply_cli_overrides(cli);

        settings.validate()?;
        Ok(settings)
    }

    /// Load `segment-builder.{toml,yaml,json}` from the given directory, if present.
    pub fn from_root(root: &str) -> Result<Self, anyhow::Error> {
        let config_path = Path::new(root).join("segment-builder");
        let settings = Self::load(File::from(config_path).required(false))?;
        settings.validate()?;
        Ok(settings)
    }

    fn load<S>(source: S) -> Result<Self, anyhow::Error>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let s = Config::builder()
            .add_source(source)
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("relay.timeout_seconds", default_relay_timeout() as i64)?
            .build()?;

        Ok(s.try_deserialize()?)
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        validator::ConfigValidator::validate(self).map_err(|errors| {
            let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!(
                "Configuration validation failed:\n{}",
                error_messages.join("\n")
            )
        })
    }

    /// Apply CLI argument overrides to settings
    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(host) = &cli.host {
            self.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.server.port = port;
        }

        if cli.has_relay_config() {
            if let Some(url) = &cli.webhook_url {
                self.relay.webhook_url = Some(url.clone());
            }
            if let Some(timeout) = cli.webhook_timeout {
                self.relay.timeout_seconds = timeout;
            }
        }
    }

    /// Whether the relay has somewhere to forward to.
    pub fn relay_configured(&self) -> bool {
        self.relay
            .webhook_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty())
    }
}

use clap::Parser;
use std::path::PathBuf;

/// Segment Builder - serves the segment builder UI and relays saved segments to a webhook
#[derive(Parser, Debug, Clone)]
#[command(name = "segment-builder", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "SEGMENT_BUILDER_CONFIG", default_value = "segment-builder.toml")]
    pub config: PathBuf,

    /// Server host address
    #[arg(long, env = "SEGMENT_BUILDER_HOST")]
    pub host: Option<String>,

    /// Server port
    #[arg(long, env = "SEGMENT_BUILDER_PORT")]
    pub port: Option<u16>,

    /// Outbound webhook URL that saved segments are forwarded to
    #[arg(long, env = "SEGMENT_BUILDER_WEBHOOK_URL")]
    pub webhook_url: Option<String>,

    /// Timeout for the outbound webhook call, in seconds
    #[arg(long, env = "SEGMENT_BUILDER_WEBHOOK_TIMEOUT")]
    pub webhook_timeout: Option<u64>,
}

impl Cli {
    /// Check if any relay configuration is provided via CLI or environment
    pub fn has_relay_config(&self) -> bool {
        self.webhook_url.is_some() || self.webhook_timeout.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["segment-builder"]);
        assert_eq!(cli.config, PathBuf::from("segment-builder.toml"));
        assert!(cli.host.is_none());
        assert!(cli.port.is_none());
        assert!(cli.webhook_url.is_none());
        assert!(cli.webhook_timeout.is_none());
    }

    #[test]
    fn test_cli_with_args() {
        let cli = Cli::parse_from([
            "segment-builder",
            "--config",
            "custom.toml",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
            "--webhook-url",
            "https://hooks.example.com/segments",
            "--webhook-timeout",
            "5",
        ]);
        assert_eq!(cli.config, PathBuf::from("custom.toml"));
        assert_eq!(cli.host, Some("0.0.0.0".to_string()));
        assert_eq!(cli.port, Some(8080));
        assert_eq!(
            cli.webhook_url,
            Some("https://hooks.example.com/segments".to_string())
        );
        assert_eq!(cli.webhook_timeout, Some(5));
    }

    #[test]
    fn test_has_relay_config() {
        let cli = Cli::parse_from(["segment-builder"]);
        assert!(!cli.has_relay_config());

        let cli_with_timeout = Cli::parse_from(["segment-builder", "--webhook-timeout", "3"]);
        assert!(cli_with_timeout.has_relay_config());
    }
}

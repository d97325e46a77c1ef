use thiserror::Error;

use crate::config::{RateLimitConfig, RelaySettings, ServerSettings, Settings};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = Self::validate_server(&settings.server) {
            errors.extend(e);
        }

        if let Err(e) = Self::validate_relay(&settings.relay) {
            errors.extend(e);
        }

        if let Some(rate_limit) = &settings.rate_limit {
            if let Err(e) = Self::validate_rate_limit(rate_limit) {
                errors.extend(e);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_server(server: &ServerSettings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if server.host.is_empty() {
            errors.push(ValidationError::MissingField("server.host".to_string()));
        }

        if server.port == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_relay(relay: &RelaySettings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        // An absent webhook is allowed: the relay answers with a failure until one is set.
        if let Some(url) = &relay.webhook_url {
            match reqwest::Url::parse(url) {
                Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
                Ok(parsed) => errors.push(ValidationError::InvalidValue {
                    field: "relay.webhook_url".to_string(),
                    reason: format!("Unsupported scheme '{}'", parsed.scheme()),
                }),
                Err(e) => errors.push(ValidationError::InvalidValue {
                    field: "relay.webhook_url".to_string(),
                    reason: e.to_string(),
                }),
            }
        }

        if relay.timeout_seconds == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "relay.timeout_seconds".to_string(),
                reason: "Timeout must be greater than 0".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_rate_limit(rate_limit: &RateLimitConfig) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if rate_limit.enabled && rate_limit.requests_per_second == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "rate_limit.requests_per_second".to_string(),
                reason: "Must be greater than 0 when rate limiting is enabled".to_string(),
            });
        }

        if rate_limit.enabled && rate_limit.burst_size == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "rate_limit.burst_size".to_string(),
                reason: "Must be greater than 0 when rate limiting is enabled".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_with(relay: RelaySettings) -> Settings {
        Settings {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            relay,
            rate_limit: None,
        }
    }

    #[test]
    fn test_valid_config() {
        let settings = settings_with(RelaySettings {
            webhook_url: Some("https://hooks.example.com/segments".to_string()),
            timeout_seconds: 10,
        });

        assert!(ConfigValidator::validate(&settings).is_ok());
    }

    #[test]
    fn test_missing_webhook_is_allowed() {
        let settings = settings_with(RelaySettings::default());
        assert!(ConfigValidator::validate(&settings).is_ok());
    }

    #[test]
    fn test_invalid_port() {
        let mut settings = settings_with(RelaySettings::default());
        settings.server.port = 0;

        let errors = ConfigValidator::validate(&settings).unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_webhook_scheme_must_be_http() {
        let settings = settings_with(RelaySettings {
            webhook_url: Some("ftp://hooks.example.com/segments".to_string()),
            timeout_seconds: 10,
        });

        let errors = ConfigValidator::validate(&settings).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::InvalidValue { field, .. } if field == "relay.webhook_url")));
    }

    #[test]
    fn test_zero_timeout_and_rate_limit() {
        let mut settings = settings_with(RelaySettings {
            webhook_url: None,
            timeout_seconds: 0,
        });
        settings.rate_limit = Some(RateLimitConfig {
            enabled: true,
            requests_per_second: 0,
            burst_size: 0,
        });

        let errors = ConfigValidator::validate(&settings).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}

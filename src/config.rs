//! Configuration types.

use std::time::Duration;

use crate::error::ConfigError;

/// Gateway configuration.
///
/// The tier identity is just a model identifier plus the shared retry
/// budget; both model tiers run the same attempt-with-backoff policy.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Model identifier for the primary tier (high capability).
    pub primary_model_id: String,
    /// Model identifier for the secondary tier (faster, cheaper).
    pub secondary_model_id: String,
    /// Maximum attempts per model tier.
    pub max_retries_per_tier: u32,
    /// Base backoff unit; attempt k waits `base_backoff * 2^(k-2)`.
    pub base_backoff: Duration,
    /// Upper bound on a single model-client call.
    pub attempt_timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            primary_model_id: "claude-sonnet-4-20250514".to_string(),
            secondary_model_id: "claude-3-5-haiku-latest".to_string(),
            max_retries_per_tier: 3,
            base_backoff: Duration::from_secs(1),
            attempt_timeout: Duration::from_secs(30),
        }
    }
}

impl GatewayConfig {
    /// Build configuration from `GATEWAY_*` environment variables,
    /// falling back to the defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let max_retries_per_tier = match std::env::var("GATEWAY_MAX_RETRIES") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "GATEWAY_MAX_RETRIES".to_string(),
                message: format!("'{raw}' is not a positive integer"),
            })?,
            Err(_) => defaults.max_retries_per_tier,
        };

        let base_backoff = match std::env::var("GATEWAY_RETRY_DELAY_SECS") {
            Ok(raw) => raw
                .parse()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidValue {
                    key: "GATEWAY_RETRY_DELAY_SECS".to_string(),
                    message: format!("'{raw}' is not a number of seconds"),
                })?,
            Err(_) => defaults.base_backoff,
        };

        Ok(Self {
            primary_model_id: std::env::var("GATEWAY_PRIMARY_MODEL")
                .unwrap_or(defaults.primary_model_id),
            secondary_model_id: std::env::var("GATEWAY_SECONDARY_MODEL")
                .unwrap_or(defaults.secondary_model_id),
            max_retries_per_tier,
            base_backoff,
            attempt_timeout: defaults.attempt_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_policy() {
        let config = GatewayConfig::default();
        assert_eq!(config.max_retries_per_tier, 3);
        assert_eq!(config.base_backoff, Duration::from_secs(1));
        assert!(config.attempt_timeout < Duration::from_secs(60));
    }

    #[test]
    fn from_env_falls_back_to_defaults() {
        // No GATEWAY_* variables are set in the test environment.
        let config = GatewayConfig::from_env().unwrap();
        let defaults = GatewayConfig::default();
        assert_eq!(config.primary_model_id, defaults.primary_model_id);
        assert_eq!(config.max_retries_per_tier, defaults.max_retries_per_tier);
        assert_eq!(config.base_backoff, defaults.base_backoff);
    }
}

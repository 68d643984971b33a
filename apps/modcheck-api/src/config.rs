//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use modcheck_core::ratelimit::RateLimitConfig;
use modcheck_infra::RedisConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Counter store target; `None` selects the in-memory store.
    pub redis: Option<RedisConfig>,
    pub rate_limit: RateLimitConfig,
    /// Recognized API keys; `None` accepts any non-empty key.
    pub api_keys: Option<Vec<String>>,
    /// Optional full modulus weight table replacing the bundled excerpt.
    pub weights_file: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let redis = env::var("REDIS_URL").ok().map(|_| RedisConfig::from_env());

        let rate_limit = RateLimitConfig {
            max_requests: env::var("RATE_LIMIT_MAX_REQUESTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
            window: Duration::from_secs(
                env::var("RATE_LIMIT_WINDOW_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
            key_prefix: env::var("RATE_LIMIT_KEY_PREFIX")
                .unwrap_or_else(|_| "ratelimit".to_string()),
        };

        let api_keys = env::var("API_KEYS")
            .ok()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|key| !key.is_empty())
                    .map(str::to_owned)
                    .collect::<Vec<_>>()
            })
            .filter(|keys| !keys.is_empty());

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            redis,
            rate_limit,
            api_keys,
            weights_file: env::var("MODULUS_WEIGHTS_FILE").ok(),
        }
    }
}

use std::time::Duration;

use scout_common::search::ProviderConfig;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub rate_limit: u32,
    pub rate_limit_window: Duration,
    pub provider: ProviderConfig,
}

impl Config {
    /// Required:
    /// - `PROVIDER_API_KEY`
    ///
    /// Optional:
    /// - `LISTEN_ADDR` (default "0.0.0.0:3000")
    /// - `PROVIDER_BASE_URL` (default "https://api.perplexity.ai")
    /// - `PROVIDER_MODEL` (default "sonar")
    /// - `PROVIDER_TIMEOUT_SECS` (default 30)
    /// - `RATE_LIMIT` (default 10 requests)
    /// - `RATE_LIMIT_WINDOW_SECS` (default 60)
    pub fn from_env() -> Result<Self, AppError> {
        let api_key = std::env::var("PROVIDER_API_KEY").map_err(|_| {
            AppError::Config("PROVIDER_API_KEY environment variable is required".to_string())
        })?;

        let base_url = std::env::var("PROVIDER_BASE_URL")
            .unwrap_or_else(|_| "https://api.perplexity.ai".to_string());

        let model = std::env::var("PROVIDER_MODEL").unwrap_or_else(|_| "sonar".to_string());

        let timeout = std::env::var("PROVIDER_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(30));

        let rate_limit = std::env::var("RATE_LIMIT")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(10);

        let rate_limit_window = std::env::var("RATE_LIMIT_WINDOW_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|&n| n > 0)
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(60));

        Ok(Self {
            listen_addr: std::env::var("LISTEN_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            rate_limit,
            rate_limit_window,
            provider: ProviderConfig {
                base_url: base_url.trim_end_matches('/').to_string(),
                api_key,
                model,
                timeout,
            },
        })
    }
}

//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Environment variable that overrides `session.cookie`.
pub const SESSION_COOKIE_ENV: &str = "MARKET_SESSION_COOKIE";

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP and crawling behavior settings
    #[serde(default)]
    pub scraper: ScraperConfig,

    /// GraphQL query variables (country/currency/market/sort)
    #[serde(default)]
    pub query: QueryConfig,

    /// Marketplace session settings
    #[serde(default)]
    pub session: SessionConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// The session cookie is overridden from `MARKET_SESSION_COOKIE` when the
    /// variable is set, so secrets stay out of the config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.apply_env();
        Ok(config)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            let mut config = Self::default();
            config.apply_env();
            config
        })
    }

    /// Pull session overrides from the environment.
    pub fn apply_env(&mut self) {
        if let Ok(cookie) = std::env::var(SESSION_COOKIE_ENV) {
            if !cookie.trim().is_empty() {
                self.session.cookie = cookie;
            }
        }
    }

    /// Validate configuration values for basic sanity.
    ///
    /// Note: an absent session cookie is deliberately not a validation error.
    /// Requests simply come back as authentication failures, which the
    /// orchestrator treats as a fatal abort.
    pub fn validate(&self) -> Result<()> {
        if self.scraper.user_agent.trim().is_empty() {
            return Err(AppError::validation("scraper.user_agent is empty"));
        }
        if self.scraper.timeout_secs == 0 {
            return Err(AppError::validation("scraper.timeout_secs must be > 0"));
        }
        if self.scraper.endpoint.trim().is_empty() {
            return Err(AppError::validation("scraper.endpoint is empty"));
        }
        if self.scraper.page_limit == 0 {
            return Err(AppError::validation("scraper.page_limit must be > 0"));
        }
        if self.scraper.pages_per_category == 0 {
            return Err(AppError::validation(
                "scraper.pages_per_category must be > 0",
            ));
        }
        if self.scraper.sleep_min_ms > self.scraper.sleep_max_ms {
            return Err(AppError::validation(
                "scraper.sleep_min_ms must be <= scraper.sleep_max_ms",
            ));
        }
        if self.session.device_id_cookie_key.trim().is_empty() {
            return Err(AppError::validation("session.device_id_cookie_key is empty"));
        }
        Ok(())
    }
}

/// HTTP client and crawl behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// GraphQL endpoint URL
    #[serde(default = "defaults::endpoint")]
    pub endpoint: String,

    /// User-Agent header for HTTP requests (desktop browser impersonation)
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Items requested per page
    #[serde(default = "defaults::page_limit")]
    pub page_limit: u32,

    /// Pages fetched per category before moving on.
    ///
    /// The driving loop keeps this at 1; raising it widens each category
    /// sweep at the cost of a more conspicuous traffic pattern.
    #[serde(default = "defaults::pages_per_category")]
    pub pages_per_category: u32,

    /// Lower bound of the randomized inter-page sleep, in milliseconds
    #[serde(default = "defaults::sleep_min")]
    pub sleep_min_ms: u64,

    /// Upper bound of the randomized inter-page sleep, in milliseconds
    #[serde(default = "defaults::sleep_max")]
    pub sleep_max_ms: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::endpoint(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            page_limit: defaults::page_limit(),
            pages_per_category: defaults::pages_per_category(),
            sleep_min_ms: defaults::sleep_min(),
            sleep_max_ms: defaults::sleep_max(),
        }
    }
}

/// Fixed GraphQL query variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    #[serde(default = "defaults::country")]
    pub country: String,

    #[serde(default = "defaults::currency")]
    pub currency: String,

    #[serde(default = "defaults::market")]
    pub market: String,

    #[serde(default = "defaults::sort")]
    pub sort: String,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            country: defaults::country(),
            currency: defaults::currency(),
            market: defaults::market(),
            sort: defaults::sort(),
        }
    }
}

/// Marketplace session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Pre-obtained browser session cookie string ("k1=v1; k2=v2; ...")
    #[serde(default)]
    pub cookie: String,

    /// Cookie key whose value becomes the device-identifier header
    #[serde(default = "defaults::device_id_cookie_key")]
    pub device_id_cookie_key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie: String::new(),
            device_id_cookie_key: defaults::device_id_cookie_key(),
        }
    }
}

mod defaults {
    // Scraper defaults
    pub fn endpoint() -> String {
        "https://stockx.com/api/p/e".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36"
            .into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn page_limit() -> u32 {
        40
    }
    pub fn pages_per_category() -> u32 {
        1
    }
    pub fn sleep_min() -> u64 {
        2000
    }
    pub fn sleep_max() -> u64 {
        5000
    }

    // Query defaults
    pub fn country() -> String {
        "US".into()
    }
    pub fn currency() -> String {
        "USD".into()
    }
    pub fn market() -> String {
        "US".into()
    }
    pub fn sort() -> String {
        "most-active".into()
    }

    // Session defaults
    pub fn device_id_cookie_key() -> String {
        "stockx_device_id".into()
    }
}

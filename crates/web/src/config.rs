//! Widget configuration.
//!
//! Defaults match the page the widget is embedded in; the native preview can
//! override them through `SHORTLIST_*` environment variables.

use shortlist_products::DEFAULT_PAGE_SIZE;
use thiserror::Error;

pub const DEFAULT_API_HOST: &str = "http://127.0.0.1:5000";

/// Path of the catalog endpoint, relative to the API host.
pub const PRODUCTS_PATH: &str = "/api/products/all";

/// Image shown when a product image fails to load.
pub const PLACEHOLDER_IMAGE: &str = "https://placehold.co/150x150/d1d5db/374151?text=Image+NA";

/// Price ceiling used when the slider value cannot be read.
pub const DEFAULT_MAX_PRICE: f64 = 1000.0;

pub const ENV_API_HOST: &str = "SHORTLIST_API_HOST";
pub const ENV_PAGE_SIZE: &str = "SHORTLIST_PAGE_SIZE";
pub const ENV_MAX_PRICE: &str = "SHORTLIST_MAX_PRICE";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct WidgetConfig {
    pub api_host: String,
    pub page_size: usize,
    pub placeholder_image: String,
    pub default_max_price: f64,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            api_host: DEFAULT_API_HOST.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            placeholder_image: PLACEHOLDER_IMAGE.to_string(),
            default_max_price: DEFAULT_MAX_PRICE,
        }
    }
}

impl WidgetConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (environment, test map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(host) = lookup(ENV_API_HOST).filter(|h| !h.trim().is_empty()) {
            config.api_host = host.trim().trim_end_matches('/').to_string();
        }

        if let Some(raw) = lookup(ENV_PAGE_SIZE) {
            config.page_size = match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                Ok(_) => {
                    return Err(ConfigError::Invalid {
                        key: ENV_PAGE_SIZE,
                        reason: "must be a positive integer".to_string(),
                    });
                }
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        key: ENV_PAGE_SIZE,
                        reason: e.to_string(),
                    });
                }
            };
        }

        if let Some(raw) = lookup(ENV_MAX_PRICE) {
            config.default_max_price = raw.trim().parse::<f64>().map_err(|e| ConfigError::Invalid {
                key: ENV_MAX_PRICE,
                reason: e.to_string(),
            })?;
        }

        Ok(config)
    }

    pub fn with_api_host(mut self, api_host: impl Into<String>) -> Self {
        self.api_host = api_host.into();
        self
    }

    pub fn products_url(&self) -> String {
        format!("{}{}", self.api_host.trim_end_matches('/'), PRODUCTS_PATH)
    }

    /// Image paths from the backend are host-relative (`/static/images/..`).
    pub fn image_url(&self, path: &str) -> String {
        format!("{}{}", self.api_host, path)
    }
}

//! Catalog fetcher: one GET against the products endpoint.
//!
//! Uses `reqwest`, which runs on Tokio natively and on the browser `fetch`
//! API under `wasm32`. No retries and no timeout: a failure is terminal for
//! the page load.

use shortlist_products::Product;

use crate::config::WidgetConfig;
use crate::types::ProductsEnvelope;

/// Message shown in place of the grid for every fetch failure.
pub const CONNECT_ERROR_MESSAGE: &str = "Could not connect to backend.";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("backend responded with HTTP {0}")]
    Status(u16),
    #[error("decode error: {0}")]
    Decode(String),
}

impl FetchError {
    /// All failures collapse into one generic message for the user.
    pub fn user_message(&self) -> &'static str {
        CONNECT_ERROR_MESSAGE
    }
}

#[derive(Debug, Clone)]
pub struct CatalogClient {
    products_url: String,
    http: reqwest::Client,
}

impl CatalogClient {
    pub fn new(config: &WidgetConfig) -> Self {
        Self::with_client(config.products_url(), reqwest::Client::new())
    }

    pub fn with_client(products_url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            products_url: products_url.into(),
            http,
        }
    }

    pub fn products_url(&self) -> &str {
        &self.products_url
    }

    /// Fetch and normalize the full catalog.
    pub async fn fetch_catalog(&self) -> Result<Vec<Product>, FetchError> {
        tracing::debug!(url = %self.products_url, "fetching catalog");

        let resp = self
            .http
            .get(&self.products_url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), url = %self.products_url, "catalog request rejected");
            return Err(FetchError::Status(status.as_u16()));
        }

        let envelope: ProductsEnvelope = resp
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;

        let catalog = envelope.into_catalog();
        tracing::info!(count = catalog.len(), "catalog loaded");
        Ok(catalog)
    }
}

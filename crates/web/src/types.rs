//! Wire and status types shared by the native and browser builds.
//!
//! These types must not depend on native-only dependencies like `tokio`.

use serde::{Deserialize, Serialize};
use shortlist_products::{Product, ProductRecord, normalize_catalog};

/// Body of `GET /api/products/all`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductsEnvelope {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub products: Option<Vec<ProductRecord>>,
}

impl ProductsEnvelope {
    /// Normalized catalog; a missing `products` list is an empty catalog.
    pub fn into_catalog(self) -> Vec<Product> {
        normalize_catalog(self.products.unwrap_or_default())
    }
}

/// Where the page session is in its (single) catalog load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Ready,
    /// Terminal for the page load; carries the user-facing message.
    Failed(String),
}

impl LoadStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, LoadStatus::Ready)
    }
}

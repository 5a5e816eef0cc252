//! `shortlist-web`
//!
//! **Responsibility:** the catalog widget itself.
//!
//! This crate provides:
//! - Catalog fetching from the backend (`reqwest`, native and browser)
//! - A page session owning catalog, filtered view and pagination state
//! - Card, message and pagination markup (Tera templates)
//! - The browser binding to the page's filter controls (`wasm32` only)

pub mod client;
pub mod config;
pub mod controls;
pub mod render;
pub mod session;
pub mod types;

#[cfg(target_arch = "wasm32")]
pub mod frontend;

pub use client::{CONNECT_ERROR_MESSAGE, CatalogClient, FetchError};
pub use config::{ConfigError, WidgetConfig};
pub use controls::ControlSnapshot;
pub use render::{CardView, RenderError, RenderedPage, Renderer};
pub use session::{Effect, GridView, PageSession, SessionEvent, SessionView};
pub use types::{LoadStatus, ProductsEnvelope};

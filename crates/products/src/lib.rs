//! Product catalog domain: normalization, filtering and pagination.
//!
//! Pure, deterministic logic over an in-memory catalog (no IO, no HTTP, no DOM).

pub mod filter;
pub mod pagination;
pub mod product;

pub use filter::{Facet, FacetKind, FacetValue, FilterState};
pub use pagination::{DEFAULT_PAGE_SIZE, PageButton, PageButtonKind, PageStrip, Pagination};
pub use product::{
    DEFAULT_DESCRIPTION, Product, ProductRecord, WireNumber, normalize_catalog, parse_float_prefix,
    parse_int_prefix,
};

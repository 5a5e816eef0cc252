//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic failures (validation, out-of-range
/// navigation). Transport and rendering failures have their own error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A control name that does not map to any facet.
    #[error("unknown facet: {0}")]
    UnknownFacet(String),

    /// A page number outside `1..=total_pages`.
    #[error("page {page} is out of range (1..={total_pages})")]
    PageOutOfRange { page: usize, total_pages: usize },
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unknown_facet(name: impl Into<String>) -> Self {
        Self::UnknownFacet(name.into())
    }

    pub fn page_out_of_range(page: usize, total_pages: usize) -> Self {
        Self::PageOutOfRange { page, total_pages }
    }
}

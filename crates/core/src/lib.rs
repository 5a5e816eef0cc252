//! `shortlist-core`: shared building blocks for the shortlist catalog widget.
//!
//! This crate contains **pure** primitives (no IO, no HTTP, no DOM).

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::ProductId;

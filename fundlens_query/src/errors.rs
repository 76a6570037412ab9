//! Error types for the query builders.

/// Errors raised while turning request parameters into a query.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A `sort_by` value the resource does not support.
    #[error("sort_by must be one of: {allowed}")]
    InvalidSortBy { value: String, allowed: &'static str },
    /// An `order` / `sort_direction` value other than asc or desc.
    #[error("order must be 'asc' or 'desc'")]
    InvalidSortDirection(String),
    /// A filter combination the builder cannot express.
    #[error("{0}")]
    Unsupported(String),
}

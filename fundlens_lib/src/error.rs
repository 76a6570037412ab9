//! Error types for the library layer.

use std::fmt;

/// Errors raised while turning request input into queries and responses.
#[derive(Debug)]
pub enum FundLensError {
    /// A sort key, direction or filter combination the query builders reject.
    Query(fundlens_query::Error),
    /// JSON serialization failed while projecting a response.
    Serialization(serde_json::Error),
    /// User-provided input failed validation.
    InvalidInput(String),
}

impl fmt::Display for FundLensError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query(e) => write!(f, "{}", e),
            Self::Serialization(e) => write!(f, "Serialization error: {}", e),
            Self::InvalidInput(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for FundLensError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Query(e) => Some(e),
            Self::Serialization(e) => Some(e),
            Self::InvalidInput(_) => None,
        }
    }
}

impl From<fundlens_query::Error> for FundLensError {
    fn from(e: fundlens_query::Error) -> Self {
        Self::Query(e)
    }
}

impl From<serde_json::Error> for FundLensError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e)
    }
}

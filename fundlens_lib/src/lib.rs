//! Library layer for FundLens: SQLite storage, validation, configuration,
//! rate limiting and the axum HTTP API over campaign-finance data.
//!
//! Query construction lives in the `fundlens_query` crate; this crate runs
//! those statements and serves the results.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod fields;
pub mod labels;
pub mod rate_limiter;
pub mod validation;

pub use fundlens_query;
pub use fundlens_query::types;
pub use fundlens_query::{
    CandidateQuery, CandidateSortBy, CommitteeQuery, CommitteeSortBy, ContributionQuery,
    ContributorQuery, Query, Race, RaceQuery, Recipient, RecipientContributorsQuery,
    SortDirection, StateSummaryQuery, TopContributorsQuery,
};

pub use config::{Config, ConfigError};
pub use db::{Db, DbError, ViewRefreshReport};
pub use error::FundLensError;
pub use rate_limiter::{RateLimit, RateLimiter, RateLimiters, Tier};

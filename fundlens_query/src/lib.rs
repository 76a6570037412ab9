//! Typed query builders and response models for the FundLens campaign-finance API.
//!
//! Every builder compiles to a [`SqlStatement`] with positional parameters;
//! executing it is left to the storage layer.

mod errors;
mod query;
pub mod sql;
pub mod types;

pub use self::errors::Error;
pub use self::query::{
    contributor_stats_statement, CandidateOrdering, CandidateQuery, CandidateSortBy,
    CommitteeQuery, CommitteeSortBy, ContributionQuery, ContributorContributionsQuery,
    ContributorContributionsSortBy, ContributorQuery, ContributorRecipientsQuery,
    ContributorRecipientsSortBy, ContributorSearchQuery, ContributorSearchSortBy, OfficeLevel,
    Query, QueryCommon, Race, RaceQuery, Recipient, RecipientContributorsQuery, RecipientSortBy,
    SortDirection, StateSummaryQuery, TopContributorsQuery, DEFAULT_PAGE_SIZE, FEDERAL_OFFICES,
    MAX_PAGE_SIZE,
};
pub use self::sql::{SqlParam, SqlStatement};

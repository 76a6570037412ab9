mod candidate;
mod committee;
mod common;
mod contribution;
mod contributor;
mod contributor_search;
mod race;
mod recipient;
mod state;

pub use candidate::{
    CandidateOrdering, CandidateQuery, CandidateSortBy, OfficeLevel, FEDERAL_OFFICES,
};
pub use committee::{CommitteeQuery, CommitteeSortBy};
pub use common::{Query, QueryCommon, SortDirection, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use contribution::ContributionQuery;
pub use contributor::{
    contributor_stats_statement, ContributorContributionsQuery, ContributorContributionsSortBy,
    ContributorQuery, ContributorRecipientsQuery, ContributorRecipientsSortBy,
    TopContributorsQuery,
};
pub use contributor_search::{ContributorSearchQuery, ContributorSearchSortBy};
pub use race::{Race, RaceQuery};
pub use recipient::{Recipient, RecipientContributorsQuery, RecipientSortBy};
pub use state::StateSummaryQuery;

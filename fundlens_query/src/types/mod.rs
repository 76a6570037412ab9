mod candidate;
mod committee;
mod contribution;
mod contributor;
mod meta;
mod metadata;
mod race;
mod state;

pub use candidate::{
    CandidateBatchRequest, CandidateBatchResponse, CandidateDetail, CandidateList,
    CandidateStats, CandidateStatsBulkRequest, CandidateStatsBulkResponse, CandidateWithStats,
};
pub use committee::{CommitteeDetail, CommitteeList, CommitteeStats, CommitteeWithStats};
pub use contribution::{ContributionList, ContributionSummary, ContributionWithRelations};
pub use contributor::{
    CandidateSummary, CommitteeSummary, ContributionSimple, ContributionWithCommittee,
    ContributorContributionsResponse, ContributorDetail, ContributorList, ContributorRecipient,
    ContributorRecipientsResponse, ContributorSearchAggregated, ContributorStats,
    ContributorWithAggregates, ContributorsSummary, RecipientContributors, RecipientSummary,
    RecipientsMeta, TopContributor,
};
pub use meta::{PaginatedResponse, PaginationMeta, UnifiedSearchResponse};
pub use metadata::{LabeledCode, StateMetadata};
pub use race::{RaceCandidate, RaceResponse, RaceSummary};
pub use state::{OfficeRaceSummary, StateSummary};

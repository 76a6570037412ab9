use serde::{Deserialize, Serialize};

use super::PaginationMeta;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ContributorList {
    pub id: i64,
    pub name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    /// Entity type code (IND, ORG, PAC, ...).
    pub entity_type: String,
    pub employer: Option<String>,
    pub occupation: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ContributorDetail {
    #[serde(flatten)]
    pub contributor: ContributorList,
    /// Deduplication confidence score (0.0-1.0).
    pub match_confidence: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

/// Lifetime giving for a contributor, earmarks excluded.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ContributorStats {
    pub contributor_id: i64,
    pub total_contributions: i64,
    pub total_amount: f64,
    pub unique_recipients: i64,
    pub avg_contribution: f64,
    pub first_contribution_date: Option<String>,
    pub last_contribution_date: Option<String>,
}

impl ContributorStats {
    pub fn zero(contributor_id: i64) -> Self {
        Self {
            contributor_id,
            total_contributions: 0,
            total_amount: 0.0,
            unique_recipients: 0,
            avg_contribution: 0.0,
            first_contribution_date: None,
            last_contribution_date: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TopContributor {
    pub contributor: ContributorList,
    pub total_amount: f64,
    pub contribution_count: i64,
    pub unique_recipients: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ContributionSimple {
    pub id: i64,
    #[serde(rename = "date")]
    pub contribution_date: String,
    pub amount: f64,
    pub contribution_type: String,
}

/// A contributor's totals toward one recipient.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ContributorWithAggregates {
    pub contributor_id: i64,
    pub contributor_name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub entity_type: String,
    pub employer: Option<String>,
    pub occupation: Option<String>,
    pub total_amount: f64,
    pub contribution_count: i64,
    pub first_contribution_date: Option<String>,
    pub last_contribution_date: Option<String>,
    /// Only filled when individual contributions were requested.
    pub contributions: Option<Vec<ContributionSimple>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CandidateSummary {
    pub id: i64,
    pub name: String,
    pub office: String,
    pub state: Option<String>,
    pub district: Option<String>,
    pub party: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CommitteeSummary {
    pub id: i64,
    pub name: String,
    pub committee_type: String,
    pub state: Option<String>,
    pub candidate_id: Option<i64>,
    pub candidate_name: Option<String>,
}

/// Header identifying who received the contributions.
/// Serializes as a `candidate` or `committee` key.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum RecipientSummary {
    Candidate(CandidateSummary),
    Committee(CommitteeSummary),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ContributorsSummary {
    pub total_contributors: i64,
    pub total_amount_raised: f64,
    pub total_contributions: i64,
    pub first_contribution: Option<String>,
    pub last_contribution: Option<String>,
}

/// Contributors to a candidate or committee, one page at a time.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RecipientContributors {
    #[serde(flatten)]
    pub recipient: RecipientSummary,
    pub summary: ContributorsSummary,
    pub contributors: Vec<ContributorWithAggregates>,
    pub meta: PaginationMeta,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ContributorSearchAggregated {
    pub contributor_id: i64,
    pub contributor_name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub entity_type: String,
    pub employer: Option<String>,
    pub occupation: Option<String>,
    pub total_amount: f64,
    pub contribution_count: i64,
    pub unique_recipients: i64,
    pub unique_candidates: i64,
    pub unique_committees: i64,
    pub first_contribution_date: Option<String>,
    pub last_contribution_date: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ContributionWithCommittee {
    pub id: i64,
    pub contributor_id: i64,
    pub recipient_committee_id: i64,
    pub committee_name: String,
    pub committee_type: String,
    pub committee_state: Option<String>,
    pub committee_party: Option<String>,
    pub amount: f64,
    pub contribution_date: String,
    pub contribution_type: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ContributorContributionsResponse {
    pub contributions: Vec<ContributionWithCommittee>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ContributorRecipient {
    pub committee_id: i64,
    pub committee_name: String,
    pub committee_type: String,
    pub committee_state: Option<String>,
    pub committee_party: Option<String>,
    pub contribution_count: i64,
    pub total_amount: f64,
    pub first_contribution_date: Option<String>,
    pub last_contribution_date: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RecipientsMeta {
    pub total_count: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ContributorRecipientsResponse {
    pub recipients: Vec<ContributorRecipient>,
    pub meta: RecipientsMeta,
}

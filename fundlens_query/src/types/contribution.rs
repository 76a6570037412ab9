use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ContributionList {
    pub id: i64,
    pub contribution_date: String,
    pub amount: f64,
    pub contribution_type: String,
    pub election_type: Option<String>,
    pub election_year: i64,
    pub election_cycle: i64,
    pub contributor_id: i64,
    pub recipient_committee_id: i64,
    pub recipient_candidate_id: Option<i64>,
    pub source_system: String,
}

/// A contribution with names resolved from its contributor, committee and candidate.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ContributionWithRelations {
    #[serde(flatten)]
    pub contribution: ContributionList,
    pub source_transaction_id: String,
    pub memo_text: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub contributor_name: String,
    pub contributor_city: Option<String>,
    pub contributor_state: Option<String>,
    pub committee_name: String,
    pub committee_type: String,
    pub candidate_name: Option<String>,
    pub candidate_office: Option<String>,
    pub candidate_state: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ContributionSummary {
    pub total_contributions: i64,
    pub total_amount: f64,
    pub avg_contribution: f64,
    pub min_contribution: f64,
    pub max_contribution: f64,
}

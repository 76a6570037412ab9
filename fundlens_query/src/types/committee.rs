use serde::{Deserialize, Serialize};

use super::CandidateList;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CommitteeList {
    pub id: i64,
    pub name: String,
    pub committee_type: String,
    pub party: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub is_active: bool,
    pub candidate_id: Option<i64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CommitteeDetail {
    pub id: i64,
    pub name: String,
    pub committee_type: String,
    pub party: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub is_active: bool,
    pub candidate_id: Option<i64>,
    pub fec_committee_id: Option<String>,
    pub state_committee_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    /// The associated candidate, when requested and present.
    pub candidate: Option<CandidateList>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CommitteeStats {
    pub committee_id: i64,
    pub total_contributions_received: i64,
    pub total_amount_received: f64,
    pub unique_contributors: i64,
    pub avg_contribution: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CommitteeWithStats {
    #[serde(flatten)]
    pub committee: CommitteeList,
    pub stats: Option<CommitteeStats>,
}

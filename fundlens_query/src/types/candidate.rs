use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Candidate as it appears in lists.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CandidateList {
    pub id: i64,
    pub name: String,
    /// Office code: H (House), S (Senate), P (President) or a state office.
    pub office: String,
    pub state: Option<String>,
    pub district: Option<String>,
    pub party: Option<String>,
    pub is_active: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CandidateDetail {
    pub id: i64,
    pub name: String,
    pub office: String,
    pub state: Option<String>,
    pub district: Option<String>,
    pub party: Option<String>,
    pub is_active: bool,
    pub fec_candidate_id: Option<String>,
    pub state_candidate_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&CandidateDetail> for CandidateList {
    fn from(d: &CandidateDetail) -> Self {
        Self {
            id: d.id,
            name: d.name.clone(),
            office: d.office.clone(),
            state: d.state.clone(),
            district: d.district.clone(),
            party: d.party.clone(),
            is_active: d.is_active,
        }
    }
}

/// Fundraising totals for a candidate.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CandidateStats {
    pub candidate_id: i64,
    pub total_contributions: i64,
    pub total_amount: f64,
    pub unique_contributors: i64,
    pub avg_contribution: f64,
}

impl CandidateStats {
    /// Stats for a candidate with no contributions.
    pub fn zero(candidate_id: i64) -> Self {
        Self {
            candidate_id,
            total_contributions: 0,
            total_amount: 0.0,
            unique_contributors: 0,
            avg_contribution: 0.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CandidateWithStats {
    #[serde(flatten)]
    pub candidate: CandidateList,
    pub stats: Option<CandidateStats>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CandidateStatsBulkRequest {
    pub candidate_ids: Vec<i64>,
}

/// Stats keyed by candidate id. Every requested id is present.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CandidateStatsBulkResponse {
    pub stats: BTreeMap<i64, CandidateStats>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CandidateBatchRequest {
    pub ids: Vec<i64>,
    #[serde(default)]
    pub include_stats: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CandidateBatchResponse {
    pub candidates: Vec<CandidateWithStats>,
}

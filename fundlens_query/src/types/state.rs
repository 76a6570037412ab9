use serde::{Deserialize, Serialize};

use super::CandidateList;

/// Candidates and money for one office within a state.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OfficeRaceSummary {
    pub office: String,
    /// House districts with candidates; null for other offices.
    pub districts: Option<Vec<String>>,
    pub candidate_count: i64,
    pub active_candidate_count: i64,
    pub total_raised: f64,
    pub top_fundraisers: Vec<CandidateList>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StateSummary {
    pub state: String,
    pub total_candidates: i64,
    pub active_candidates: i64,
    pub total_raised: f64,
    pub total_contributions: i64,
    pub unique_contributors: i64,
    pub races: Vec<OfficeRaceSummary>,
}

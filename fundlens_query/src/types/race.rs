use serde::{Deserialize, Serialize};

use super::CandidateStats;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RaceCandidate {
    pub id: i64,
    pub name: String,
    pub party: Option<String>,
    pub is_active: bool,
    pub stats: Option<CandidateStats>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RaceSummary {
    pub total_candidates: i64,
    pub active_candidates: i64,
    pub total_amount_raised: f64,
    pub total_contributions: i64,
    pub unique_contributors: i64,
}

impl RaceSummary {
    pub fn empty() -> Self {
        Self {
            total_candidates: 0,
            active_candidates: 0,
            total_amount_raised: 0.0,
            total_contributions: 0,
            unique_contributors: 0,
        }
    }
}

/// A presidential, Senate or House race. `state` and `district` are omitted
/// where the race has none.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RaceResponse {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub district: Option<String>,
    pub office: String,
    pub summary: RaceSummary,
    pub candidates: Vec<RaceCandidate>,
}

use std::collections::BTreeMap;

use fundlens_query::types::{
    CandidateList, CandidateStats, CandidateStatsBulkResponse, CandidateWithStats,
    CandidateSummary, ContributionSimple, ContributorsSummary, PaginatedResponse, RaceResponse,
    RaceSummary, RecipientContributors, RecipientSummary, PaginationMeta,
};
use serde_json::json;

fn candidate() -> CandidateList {
    CandidateList {
        id: 1,
        name: "Jane Doe".into(),
        office: "S".into(),
        state: Some("MD".into()),
        district: None,
        party: Some("DEM".into()),
        is_active: true,
    }
}

#[test]
fn candidate_with_stats_flattens() {
    let value = serde_json::to_value(CandidateWithStats {
        candidate: candidate(),
        stats: Some(CandidateStats::zero(1)),
    })
    .unwrap();
    assert_eq!(value["name"], "Jane Doe");
    assert_eq!(value["stats"]["total_amount"], 0.0);
    assert!(value.get("candidate").is_none());
}

#[test]
fn contribution_simple_uses_date_key() {
    let value = serde_json::to_value(ContributionSimple {
        id: 4,
        contribution_date: "2024-02-01".into(),
        amount: 25.0,
        contribution_type: "DIRECT".into(),
    })
    .unwrap();
    assert_eq!(value["date"], "2024-02-01");
    assert!(value.get("contribution_date").is_none());
}

#[test]
fn recipient_contributors_keyed_by_recipient_kind() {
    let response = RecipientContributors {
        recipient: RecipientSummary::Candidate(CandidateSummary {
            id: 1,
            name: "Jane Doe".into(),
            office: "S".into(),
            state: Some("MD".into()),
            district: None,
            party: None,
        }),
        summary: ContributorsSummary {
            total_contributors: 0,
            total_amount_raised: 0.0,
            total_contributions: 0,
            first_contribution: None,
            last_contribution: None,
        },
        contributors: vec![],
        meta: PaginationMeta::from_offset(0, 25, 0),
    };
    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["candidate"]["name"], "Jane Doe");
    assert_eq!(value["meta"]["total_pages"], 0);

    let back: RecipientContributors = serde_json::from_value(value).unwrap();
    assert_eq!(back, response);
}

#[test]
fn presidential_race_omits_state() {
    let value = serde_json::to_value(RaceResponse {
        state: None,
        district: None,
        office: "P".into(),
        summary: RaceSummary::empty(),
        candidates: vec![],
    })
    .unwrap();
    assert_eq!(
        value,
        json!({
            "office": "P",
            "summary": {
                "total_candidates": 0,
                "active_candidates": 0,
                "total_amount_raised": 0.0,
                "total_contributions": 0,
                "unique_contributors": 0
            },
            "candidates": []
        })
    );
}

#[test]
fn bulk_stats_keys_are_strings() {
    let mut stats = BTreeMap::new();
    stats.insert(7, CandidateStats::zero(7));
    let value = serde_json::to_value(CandidateStatsBulkResponse { stats }).unwrap();
    assert_eq!(value["stats"]["7"]["candidate_id"], 7);
}

#[test]
fn paginated_response_shape() {
    let page = PaginatedResponse::new(vec![candidate()], 1, 50, 1);
    let value = serde_json::to_value(&page).unwrap();
    assert_eq!(value["items"][0]["office"], "S");
    assert_eq!(value["meta"]["total_pages"], 1);
    assert_eq!(value["meta"]["has_next"], false);
}

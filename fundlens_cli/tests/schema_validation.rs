use fundlens_lib::types::{
    CandidateList, CandidateStats, PaginatedResponse, RaceCandidate, RaceResponse, RaceSummary,
    TopContributor,
};
use serde_json::Value;
use std::path::{Path, PathBuf};

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("CLI crate should be inside workspace")
        .to_path_buf()
}

fn load_fixture(name: &str) -> Value {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("read fixture {}: {}", path.display(), e));
    serde_json::from_str(&text).expect("fixture is valid JSON")
}

fn load_schema(name: &str) -> Value {
    let path = workspace_root().join("schema").join(name);
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("read schema {}: {}", path.display(), e));
    serde_json::from_str(&text).expect("schema is valid JSON")
}

fn assert_valid(schema_name: &str, data: &Value) {
    let schema = load_schema(schema_name);
    let validator = jsonschema::draft202012::new(&schema)
        .unwrap_or_else(|e| panic!("{schema_name} compiles: {e}"));
    if let Err(e) = validator.validate(data) {
        panic!("{schema_name} rejected data: {e}");
    }
}

fn is_valid(schema_name: &str, data: &Value) -> bool {
    let schema = load_schema(schema_name);
    jsonschema::draft202012::new(&schema)
        .expect("schema compiles")
        .is_valid(data)
}

// ---------------------------------------------------------------------------
// Positive validation: fixtures conform to their schemas
// ---------------------------------------------------------------------------

#[test]
fn test_top_contributors_fixture_conforms_to_schema() {
    assert_valid("top_contributor.schema.json", &load_fixture("top_contributors.json"));
}

#[test]
fn test_race_fixture_conforms_to_schema() {
    assert_valid("race.schema.json", &load_fixture("race.json"));
}

#[test]
fn test_candidates_page_fixture_conforms_to_schema() {
    assert_valid("candidate_page.schema.json", &load_fixture("candidates_page.json"));
}

// ---------------------------------------------------------------------------
// Serialized response types conform to their schemas
// ---------------------------------------------------------------------------

#[test]
fn test_serialized_top_contributors_conform() {
    let parsed: Vec<TopContributor> =
        serde_json::from_value(load_fixture("top_contributors.json")).unwrap();
    let data = serde_json::to_value(&parsed).unwrap();
    assert_valid("top_contributor.schema.json", &data);
}

#[test]
fn test_serialized_presidential_race_omits_geography() {
    let race = RaceResponse {
        state: None,
        district: None,
        office: "P".to_string(),
        summary: RaceSummary::empty(),
        candidates: vec![RaceCandidate {
            id: 4,
            name: "DOE, JANE".to_string(),
            party: Some("DEM".to_string()),
            is_active: true,
            stats: Some(CandidateStats::zero(4)),
        }],
    };
    let data = serde_json::to_value(&race).unwrap();
    assert!(data.get("state").is_none());
    assert!(data.get("district").is_none());
    assert_valid("race.schema.json", &data);
}

#[test]
fn test_serialized_candidate_page_conforms() {
    let page = PaginatedResponse::new(
        vec![CandidateList {
            id: 1,
            name: "RASKIN, JAMIE".to_string(),
            office: "H".to_string(),
            state: Some("MD".to_string()),
            district: Some("08".to_string()),
            party: Some("DEM".to_string()),
            is_active: true,
        }],
        1,
        50,
        1,
    );
    let data = serde_json::to_value(&page).unwrap();
    assert_eq!(data["meta"]["total_pages"], 1);
    assert_valid("candidate_page.schema.json", &data);
}

#[test]
fn test_empty_page_has_zero_pages() {
    let page: PaginatedResponse<CandidateList> = PaginatedResponse::new(vec![], 1, 50, 0);
    let data = serde_json::to_value(&page).unwrap();
    assert_eq!(data["meta"]["total_pages"], 0);
    assert_eq!(data["meta"]["has_next"], false);
    assert_valid("candidate_page.schema.json", &data);
}

// ---------------------------------------------------------------------------
// Negative validation: schemas reject invalid data
// ---------------------------------------------------------------------------

#[test]
fn test_top_contributor_schema_rejects_missing_required_field() {
    let mut data = load_fixture("top_contributors.json");
    data[0].as_object_mut().unwrap().remove("total_amount");
    assert!(!is_valid("top_contributor.schema.json", &data));
}

#[test]
fn test_race_schema_rejects_unknown_office() {
    let mut data = load_fixture("race.json");
    data["office"] = Value::String("GOV".to_string());
    assert!(!is_valid("race.schema.json", &data));
}

#[test]
fn test_candidate_page_schema_rejects_zero_page_size() {
    let mut data = load_fixture("candidates_page.json");
    data["meta"]["page_size"] = Value::from(0);
    assert!(!is_valid("candidate_page.schema.json", &data));
}

use super::*;

fn load_top_contributors_fixture() -> Vec<TopContributor> {
    let json_str = include_str!("../tests/fixtures/top_contributors.json");
    serde_json::from_str(json_str).unwrap()
}

fn load_race_fixture() -> RaceResponse {
    let json_str = include_str!("../tests/fixtures/race.json");
    serde_json::from_str(json_str).unwrap()
}

// -- format_amount tests --

#[test]
fn test_format_amount_millions() {
    assert_eq!(format_amount(2_500_000.0), "$2.5M");
}

#[test]
fn test_format_amount_thousands() {
    assert_eq!(format_amount(1_200.0), "$1.2K");
}

#[test]
fn test_format_amount_small() {
    assert_eq!(format_amount(75.5), "$75.50");
    assert_eq!(format_amount(0.0), "$0.00");
}

#[test]
fn test_format_location() {
    assert_eq!(format_location(Some("BALTIMORE"), Some("MD")), "BALTIMORE, MD");
    assert_eq!(format_location(None, Some("MD")), "MD");
    assert_eq!(format_location(None, None), "");
}

// -- Row builder tests --

#[test]
fn test_build_top_contributor_rows_mapping() {
    let rows = build_top_contributor_rows(&load_top_contributors_fixture());
    assert_eq!(rows.len(), 2);

    let row = &rows[0];
    assert_eq!(row.name, "TEACHERS PAC");
    assert_eq!(row.entity_type, "PAC");
    assert_eq!(row.location, "WASHINGTON, DC");
    assert_eq!(row.total, "$1.0K");
    assert_eq!(row.contributions, 1);
    assert_eq!(row.recipients, 1);
}

#[test]
fn test_build_top_contributor_rows_empty() {
    assert!(build_top_contributor_rows(&[]).is_empty());
}

#[test]
fn test_build_race_rows_without_stats() {
    let rows = build_race_rows(&load_race_fixture());
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0].raised, "$1.2K");
    assert_eq!(rows[0].active, "yes");

    let row = &rows[1];
    assert_eq!(row.party, "");
    assert_eq!(row.active, "no");
    assert_eq!(row.raised, "-");
    assert_eq!(row.contributions, 0);
}

#[test]
fn test_race_title() {
    assert_eq!(
        race_title(&load_race_fixture()),
        "Senate MD: 2 candidates (1 active), $1.2K raised"
    );
}

#[test]
fn test_build_refresh_rows_order() {
    let report = ViewRefreshReport {
        candidate_stats: 4,
        contributor_stats: 3,
        contributor_candidate_stats: 5,
        contributor_committee_stats: 6,
        refreshed_at: "2024-07-01T00:00:00Z".to_string(),
    };
    let rows = build_refresh_rows(&report);
    let tables: Vec<&str> = rows.iter().map(|r| r.table).collect();
    assert_eq!(
        tables,
        vec![
            "mv_candidate_stats",
            "mv_contributor_stats",
            "mv_contributor_candidate_stats",
            "mv_contributor_committee_stats",
        ]
    );
    assert_eq!(rows[2].rows, 5);
}

#[test]
fn test_markdown_table_renders_headers() {
    let mut table = Table::new(build_top_contributor_rows(&load_top_contributors_fixture()));
    table.with(Style::markdown());
    let rendered = table.to_string();
    assert!(rendered.contains("| Name"));
    assert!(rendered.contains("TEACHERS PAC"));
}

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use fundlens_lib::api::{router, AppState};
use fundlens_lib::{Config, Db};

const SEED: &str = "
INSERT INTO candidate (id, name, office, state, district, party, is_active) VALUES
    (1, 'RASKIN, JAMIE', 'H', 'MD', '08', 'DEM', 1),
    (2, 'HOGAN, LARRY', 'S', 'MD', NULL, 'REP', 1),
    (3, 'SMITH, JOHN', 'H', 'MD', '05', 'REP', 0),
    (4, 'DOE, JANE', 'P', NULL, NULL, 'DEM', 1);

INSERT INTO committee (id, name, committee_type, party, state, city, is_active, candidate_id) VALUES
    (10, 'RASKIN FOR CONGRESS', 'H', 'DEM', 'MD', 'TAKOMA PARK', 1, 1),
    (11, 'HOGAN FOR SENATE', 'S', 'REP', 'MD', 'ANNAPOLIS', 1, 2),
    (12, 'ACTBLUE', 'V', NULL, 'MA', 'SOMERVILLE', 1, NULL);

INSERT INTO contributor (id, name, city, state, zip, entity_type) VALUES
    (1, 'ADAMS, ALICE', 'BALTIMORE', 'MD', '21201', 'IND'),
    (2, 'BROWN, BOB', 'RICHMOND', 'VA', '23220', 'IND'),
    (3, 'TEACHERS PAC', 'WASHINGTON', 'DC', '20001', 'PAC');

INSERT INTO contribution (id, contribution_date, amount, contribution_type, election_type, election_year, election_cycle,
                          contributor_id, recipient_committee_id, recipient_candidate_id, source_system,
                          source_transaction_id, memo_text, is_earmark_receipt) VALUES
    (100, '2024-01-15', 100.0, 'DIRECT', 'P2024', 2024, 2024, 1, 10, 1, 'FEC', 'T100', NULL, 0),
    (101, '2024-03-10', 250.0, 'DIRECT', 'G2024', 2024, 2024, 1, 10, 1, 'FEC', 'T101', NULL, 0),
    (103, '2024-02-20', 500.0, 'DIRECT', 'P2024', 2024, 2024, 2, 10, 1, 'FEC', 'T103', NULL, 0),
    (104, '2024-05-05', 1000.0, 'PAC', 'G2024', 2024, 2024, 3, 11, 2, 'FEC', 'T104', NULL, 0),
    (106, '2023-11-11', 75.0, 'DIRECT', NULL, 2023, 2024, 2, 12, NULL, 'FEC', 'T106', NULL, 0);
";

fn test_config() -> Config {
    Config::load_with(None, |key| {
        (key == "DATABASE_URL").then(|| ":memory:".to_string())
    })
    .unwrap()
}

fn app_with(config: Config) -> Router {
    let mut db = Db::open_in_memory().unwrap();
    db.init().unwrap();
    db.conn().execute_batch(SEED).unwrap();
    db.refresh_materialized_views().unwrap();
    router(AppState::new(db, config))
}

fn app() -> Router {
    app_with(test_config())
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

#[tokio::test]
async fn root_and_health() {
    let app = app();
    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "FundLens API");
    assert_eq!(body["openapi_url"], "/openapi.json");

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy"}));
}

#[tokio::test]
async fn candidate_detail_and_not_found() {
    let app = app();
    let (status, body) = get(&app, "/candidates/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "RASKIN, JAMIE");

    let (status, body) = get(&app, "/candidates/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"detail": "Candidate not found"}));
}

#[tokio::test]
async fn candidate_list_filters_and_paginates() {
    let app = app();
    let (status, body) = get(&app, "/candidates?state=md&page_size=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total_items"], 3);
    assert_eq!(body["meta"]["total_pages"], 2);
    assert_eq!(body["meta"]["has_next"], true);
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert!(body["items"][0].get("stats").is_none());
}

#[tokio::test]
async fn candidate_list_projects_fields() {
    let app = app();
    let (status, body) = get(&app, "/candidates?office=P&fields=id,name").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"], json!([{"id": 4, "name": "DOE, JANE"}]));
}

#[tokio::test]
async fn out_of_range_page_is_unprocessable() {
    let app = app();
    let (status, _) = get(&app, "/candidates?page=0").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let (status, _) = get(&app, "/candidates?page_size=1001").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let (status, _) = get(&app, "/candidates?page=abc").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn page_past_the_end_is_empty() {
    let app = app();
    let (status, body) = get(&app, "/candidates?page=9223372036854775807").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"], json!([]));
    assert_eq!(body["meta"]["page"], i64::MAX);
    assert_eq!(body["meta"]["total_items"], 4);
    assert_eq!(body["meta"]["has_next"], false);

    let (status, body) = get(&app, "/contributors/by-candidate/1?page=9223372036854775807").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["contributors"], json!([]));
    assert_eq!(body["meta"]["has_next"], false);
}

#[tokio::test]
async fn invalid_order_is_bad_request() {
    let app = app();
    let (status, body) = get(&app, "/candidates/by-state/MD?order=sideways").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "order must be 'asc' or 'desc'");
}

#[tokio::test]
async fn us_house_rejects_several_districts() {
    let app = app();
    let (status, body) = get(&app, "/candidates/by-state/MD/us-house?district=05,08").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .starts_with("Multiple district filtering not supported"));

    let (status, body) = get(&app, "/candidates/by-state/MD/us-house?district=08").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total_items"], 1);
    assert_eq!(body["items"][0]["id"], 1);
}

#[tokio::test]
async fn bulk_stats_zero_fills_unknown_ids() {
    let app = app();
    let (status, body) = post_json(&app, "/candidates/stats/bulk", json!({"candidate_ids": [1, 999]})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stats"]["1"]["total_contributions"], 3);
    assert_eq!(body["stats"]["999"]["total_contributions"], 0);

    let (status, _) = post_json(&app, "/candidates/stats/bulk", json!({"candidate_ids": []})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn batch_details_keep_request_order() {
    let app = app();
    let (status, body) = post_json(&app, "/candidates/details/batch", json!({"ids": [2, 999, 1]})).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body["candidates"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![2, 1]);
}

#[tokio::test]
async fn committee_detail_embeds_candidate() {
    let app = app();
    let (status, body) = get(&app, "/committees/10").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["candidate"]["name"], "RASKIN, JAMIE");

    let (status, body) = get(&app, "/committees/10?include_candidate=false").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["candidate"].is_null());

    let (status, body) = get(&app, "/committees/77/stats").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Committee not found");
}

#[tokio::test]
async fn contributors_by_candidate_reports_recipient() {
    let app = app();
    let (status, body) = get(&app, "/contributors/by-candidate/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["candidate"]["id"], 1);
    assert_eq!(body["contributors"].as_array().unwrap().len(), 2);
    assert_eq!(body["meta"]["page"], 1);
    assert_eq!(body["meta"]["page_size"], 25);

    let (status, _) = get(&app, "/contributors/by-candidate/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn contributor_recipients_meta_counts() {
    let app = app();
    let (status, body) = get(&app, "/contributors/2/recipients").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"], json!({"total_count": 2}));

    let (status, body) = get(&app, "/contributors/42/contributions").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Contributor not found");
}

#[tokio::test]
async fn top_contributors_meta_uses_limit() {
    let app = app();
    let (status, body) = get(&app, "/contributors/top?limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["page"], 1);
    assert_eq!(body["meta"]["page_size"], 2);
    assert_eq!(body["items"][0]["contributor"]["name"], "TEACHERS PAC");
}

#[tokio::test]
async fn contribution_summary_over_all_rows() {
    let app = app();
    let (status, body) = get(&app, "/contributions/summary").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_contributions"], 5);
    assert_eq!(body["total_amount"], 1925.0);
    assert_eq!(body["max_contribution"], 1000.0);

    let (status, body) = get(&app, "/contributions/by-committee/10").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total_items"], 3);
}

#[tokio::test]
async fn races_and_state_summary() {
    let app = app();
    let (status, body) = get(&app, "/races/presidential").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["office"], "P");
    assert_eq!(body["candidates"].as_array().unwrap().len(), 1);

    let (status, _) = get(&app, "/races/VA/house/01").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = get(&app, "/states/MD/summary").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_candidates"], 3);

    let (status, _) = get(&app, "/states/MD/summary?top_n=21").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn metadata_is_cacheable() {
    let app = app();
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/metadata/states").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).unwrap(),
        "public, max-age=3600"
    );
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body[0], json!({"code": "DC", "name": "District of Columbia"}));

    let (_, body) = get(&app, "/metadata/committees/types").await;
    assert_eq!(body, json!(["H", "S", "V"]));

    let (_, body) = get(&app, "/metadata/candidates/offices?include_labels=true").await;
    assert_eq!(body[0], json!({"code": "H", "label": "U.S. House"}));
}

#[tokio::test]
async fn unified_search_limits_categories() {
    let app = app();
    let (status, body) = get(&app, "/search?q=smith&categories=candidates").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["candidates"]["meta"]["total_items"], 1);
    assert_eq!(body["candidates"]["meta"]["page_size"], 10);
    assert!(body["contributors"].is_null());
    assert!(body["committees"].is_null());
}

#[tokio::test]
async fn search_tier_is_rate_limited() {
    let mut config = test_config();
    config.rate_limit_search = "2/minute".parse().unwrap();
    let app = app_with(config);

    for _ in 0..2 {
        let (status, _) = get(&app, "/candidates/search?q=hogan").await;
        assert_eq!(status, StatusCode::OK);
    }
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/search?q=hogan").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key(header::RETRY_AFTER));

    let (status, _) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn disabled_rate_limit_never_rejects() {
    let mut config = test_config();
    config.rate_limit_enabled = false;
    config.rate_limit_search = "1/minute".parse().unwrap();
    let app = app_with(config);

    for _ in 0..3 {
        let (status, _) = get(&app, "/search?q=raskin").await;
        assert_eq!(status, StatusCode::OK);
    }
}

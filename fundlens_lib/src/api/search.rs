use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::debug;

use fundlens_query::types::{PaginatedResponse, UnifiedSearchResponse};
use fundlens_query::MAX_PAGE_SIZE;

use crate::rate_limiter::Tier;
use crate::validation::{validate_range, validate_search};

use super::{ApiError, AppState};

const CATEGORIES: [&str; 3] = ["candidates", "contributors", "committees"];

pub(super) fn routes(state: &AppState) -> Router<AppState> {
    state.limited(Router::new().route("/", get(unified_search)), Tier::Search)
}

#[derive(Deserialize, Debug)]
struct SearchParams {
    q: String,
    categories: Option<String>,
    page_size: Option<i64>,
}

/// Lowercased category names; every category when none are given.
fn parse_categories(input: Option<&str>) -> Vec<String> {
    let parsed: Vec<String> = input
        .unwrap_or_default()
        .split(',')
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty())
        .collect();
    if parsed.is_empty() {
        CATEGORIES.iter().map(|c| c.to_string()).collect()
    } else {
        parsed
    }
}

async fn unified_search(
    State(app): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<UnifiedSearchResponse>, ApiError> {
    let Query(p) = params?;
    let search = validate_search(&p.q)?;
    let page_size = validate_range("page_size", p.page_size.unwrap_or(10), 1, MAX_PAGE_SIZE)?;
    let categories = parse_categories(p.categories.as_deref());
    debug!(q = %search, ?categories, page_size, "unified search");

    let response = app
        .with_db(move |db| {
            let wants = |name: &str| categories.iter().any(|c| c == name);
            let mut response = UnifiedSearchResponse::default();
            if wants("candidates") {
                let (items, total) = db.search_candidates(&search, page_size)?;
                response.candidates = Some(PaginatedResponse::new(items, 1, page_size, total));
            }
            if wants("contributors") {
                let (items, total) = db.search_contributors(&search, page_size)?;
                response.contributors = Some(PaginatedResponse::new(items, 1, page_size, total));
            }
            if wants("committees") {
                let (items, total) = db.search_committees(&search, page_size)?;
                response.committees = Some(PaginatedResponse::new(items, 1, page_size, total));
            }
            Ok(response)
        })
        .await?;
    Ok(Json(response))
}

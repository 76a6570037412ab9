use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;

use fundlens_query::types::{
    CommitteeDetail, CommitteeList, CommitteeStats, PaginatedResponse, PaginationMeta,
};
use fundlens_query::{CommitteeQuery, CommitteeSortBy, Query as _, SortDirection};

use crate::fields::parse_fields;
use crate::rate_limiter::Tier;
use crate::validation::{validate_search, validate_state};

use super::params::{self, paginated, parse_or};
use super::{ApiError, AppState};

pub(super) fn routes(state: &AppState) -> Router<AppState> {
    let default = Router::new()
        .route("/", get(list_committees))
        .route("/by-candidate/:candidate_id", get(committees_by_candidate))
        .route("/by-state/:state", get(committees_by_state))
        .route("/:committee_id", get(get_committee));
    let search = Router::new().route("/search", get(search_committees));
    let stats = Router::new().route("/:committee_id/stats", get(committee_stats));

    state
        .limited(default, Tier::Default)
        .merge(state.limited(search, Tier::Search))
        .merge(state.limited(stats, Tier::Stats))
}

#[derive(Deserialize, Debug, Default)]
struct ListParams {
    page: Option<i64>,
    page_size: Option<i64>,
    state: Option<String>,
    committee_type: Option<String>,
    party: Option<String>,
    is_active: Option<bool>,
    candidate_id: Option<i64>,
    min_total_received: Option<f64>,
    #[serde(default)]
    include_stats: bool,
    sort_by: Option<String>,
    order: Option<String>,
    fields: Option<String>,
}

async fn list_committees(
    State(app): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(p) = params?;
    let (page, page_size) = params::page(p.page, p.page_size, app.config.default_page_size, &app.config)?;
    let sort_by = parse_or(p.sort_by.as_deref(), CommitteeSortBy::Name)?;
    let order = parse_or(p.order.as_deref(), SortDirection::Asc)?;

    let mut query = CommitteeQuery::default()
        .with_stats(p.include_stats)
        .with_sort_by(sort_by)
        .with_sort_direction(order)
        .with_page(page)
        .with_page_size(page_size);
    if let Some(state) = params::state(p.state.as_deref())? {
        query = query.with_state(&state);
    }
    if let Some(committee_type) = params::code(p.committee_type.as_deref()) {
        query = query.with_committee_type(&committee_type);
    }
    if let Some(party) = params::code(p.party.as_deref()) {
        query = query.with_party(&party);
    }
    if let Some(is_active) = p.is_active {
        query = query.with_is_active(is_active);
    }
    if let Some(candidate_id) = p.candidate_id {
        query = query.with_candidate_id(candidate_id);
    }
    if let Some(min) = params::amount("min_total_received", p.min_total_received)? {
        query = query.with_min_total_received(min);
    }

    let include_stats = p.include_stats;
    let (items, total) = app.with_db(move |db| Ok(db.query_committees(&query)?)).await?;
    let meta = PaginationMeta::new(page, page_size, total);
    let fields = parse_fields(p.fields.as_deref());
    if include_stats {
        paginated(items, meta, &fields)
    } else {
        let items: Vec<CommitteeList> = items.into_iter().map(|c| c.committee).collect();
        paginated(items, meta, &fields)
    }
}

#[derive(Deserialize, Debug)]
struct SearchParams {
    q: String,
    page: Option<i64>,
    page_size: Option<i64>,
    state: Option<String>,
    committee_type: Option<String>,
    party: Option<String>,
    is_active: Option<bool>,
}

async fn search_committees(
    State(app): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<PaginatedResponse<CommitteeList>>, ApiError> {
    let Query(p) = params?;
    let search = validate_search(&p.q)?;
    let (page, page_size) = params::page(p.page, p.page_size, app.config.default_page_size, &app.config)?;

    let mut query = CommitteeQuery::default()
        .with_search(&search)
        .with_page(page)
        .with_page_size(page_size);
    if let Some(state) = params::state(p.state.as_deref())? {
        query = query.with_state(&state);
    }
    if let Some(committee_type) = params::code(p.committee_type.as_deref()) {
        query = query.with_committee_type(&committee_type);
    }
    if let Some(party) = params::code(p.party.as_deref()) {
        query = query.with_party(&party);
    }
    if let Some(is_active) = p.is_active {
        query = query.with_is_active(is_active);
    }

    let (items, total) = app.with_db(move |db| Ok(db.query_committees(&query)?)).await?;
    Ok(Json(PaginatedResponse::new(
        items.into_iter().map(|c| c.committee).collect(),
        page,
        page_size,
        total,
    )))
}

async fn committees_by_candidate(
    State(app): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<CommitteeList>>, ApiError> {
    let Path(candidate_id) = path?;
    let committees = app
        .with_db(move |db| Ok(db.committees_by_candidate(candidate_id)?))
        .await?;
    Ok(Json(committees))
}

async fn committees_by_state(
    State(app): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<CommitteeList>>, ApiError> {
    let Path(state) = path?;
    let state = validate_state(&state)?;
    let committees = app.with_db(move |db| Ok(db.committees_by_state(&state)?)).await?;
    Ok(Json(committees))
}

#[derive(Deserialize, Debug)]
struct DetailParams {
    #[serde(default = "include_candidate_default")]
    include_candidate: bool,
}

fn include_candidate_default() -> bool {
    true
}

async fn get_committee(
    State(app): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    params: Result<Query<DetailParams>, QueryRejection>,
) -> Result<Json<CommitteeDetail>, ApiError> {
    let Path(id) = path?;
    let Query(p) = params?;
    app.with_db(move |db| {
        db.get_committee(id, p.include_candidate)?
            .ok_or(ApiError::NotFound("Committee not found"))
    })
    .await
    .map(Json)
}

async fn committee_stats(
    State(app): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<CommitteeStats>, ApiError> {
    let Path(id) = path?;
    app.with_db(move |db| db.committee_stats(id)?.ok_or(ApiError::NotFound("Committee not found")))
        .await
        .map(Json)
}

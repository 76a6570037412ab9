use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;

use fundlens_query::types::{
    CandidateBatchRequest, CandidateBatchResponse, CandidateDetail, CandidateList, CandidateStats,
    CandidateStatsBulkRequest, CandidateStatsBulkResponse, PaginatedResponse, PaginationMeta,
};
use fundlens_query::{
    CandidateOrdering, CandidateQuery, CandidateSortBy, OfficeLevel, Query as _, SortDirection,
};

use crate::fields::parse_fields;
use crate::rate_limiter::Tier;
use crate::validation::{parse_code_list, validate_district, validate_ids, validate_search, validate_state};

use super::params::{self, paginated, parse_or};
use super::{ApiError, AppState};

pub(super) fn routes(state: &AppState) -> Router<AppState> {
    let default = Router::new()
        .route("/", get(list_candidates))
        .route("/states", get(candidate_states))
        .route("/by-state/:state", get(candidates_by_state))
        .route("/by-state/:state/us-house", get(house_candidates))
        .route("/by-state/:state/us-senate", get(senate_candidates))
        .route("/details/batch", post(batch_details))
        .route("/:candidate_id", get(get_candidate));
    let search = Router::new().route("/search", get(search_candidates));
    let stats = Router::new()
        .route("/:candidate_id/stats", get(candidate_stats))
        .route("/stats/bulk", post(bulk_stats));

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
    office: Option<String>,
    party: Option<String>,
    district: Option<String>,
    is_active: Option<bool>,
    level: Option<String>,
    min_total_amount: Option<f64>,
    #[serde(default)]
    include_stats: bool,
    fields: Option<String>,
}

async fn list_candidates(
    State(app): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(p) = params?;
    let (page, page_size) = params::page(p.page, p.page_size, app.config.default_page_size, &app.config)?;

    let mut query = CandidateQuery::default()
        .with_offices(&parse_code_list(p.office.as_deref()))
        .with_parties(&parse_code_list(p.party.as_deref()))
        .with_stats(p.include_stats)
        .with_page(page)
        .with_page_size(page_size);
    if let Some(state) = params::state(p.state.as_deref())? {
        query = query.with_state(&state);
    }
    if let Some(ref district) = p.district {
        query = query.with_district(&validate_district(district)?);
    }
    if let Some(is_active) = p.is_active {
        query = query.with_is_active(is_active);
    }
    if let Some(ref level) = p.level {
        query = query.with_level(level.parse::<OfficeLevel>()?);
    }
    if let Some(min) = params::amount("min_total_amount", p.min_total_amount)? {
        query = query.with_min_total_amount(min);
    }

    let include_stats = p.include_stats;
    let (items, total) = app.with_db(move |db| Ok(db.query_candidates(&query)?)).await?;
    let meta = PaginationMeta::new(page, page_size, total);
    let fields = parse_fields(p.fields.as_deref());
    if include_stats {
        paginated(items, meta, &fields)
    } else {
        let items: Vec<CandidateList> = items.into_iter().map(|c| c.candidate).collect();
        paginated(items, meta, &fields)
    }
}

#[derive(Deserialize, Debug)]
struct SearchParams {
    q: String,
    page: Option<i64>,
    page_size: Option<i64>,
    state: Option<String>,
    office: Option<String>,
    party: Option<String>,
    is_active: Option<bool>,
    #[serde(default)]
    has_fundraising: bool,
}

async fn search_candidates(
    State(app): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<PaginatedResponse<CandidateList>>, ApiError> {
    let Query(p) = params?;
    let search = validate_search(&p.q)?;
    let (page, page_size) = params::page(p.page, p.page_size, app.config.default_page_size, &app.config)?;

    let mut query = CandidateQuery::default()
        .with_search(&search)
        .with_offices(&parse_code_list(p.office.as_deref()))
        .with_parties(&parse_code_list(p.party.as_deref()))
        .with_has_fundraising(p.has_fundraising)
        .with_page(page)
        .with_page_size(page_size);
    if let Some(state) = params::state(p.state.as_deref())? {
        query = query.with_state(&state);
    }
    if let Some(is_active) = p.is_active {
        query = query.with_is_active(is_active);
    }

    let (items, total) = app.with_db(move |db| Ok(db.query_candidates(&query)?)).await?;
    Ok(Json(PaginatedResponse::new(
        items.into_iter().map(|c| c.candidate).collect(),
        page,
        page_size,
        total,
    )))
}

async fn candidate_states(State(app): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let states = app.with_db(|db| Ok(db.candidate_states()?)).await?;
    Ok(Json(states))
}

#[derive(Deserialize, Debug, Default)]
struct ByStateParams {
    page: Option<i64>,
    page_size: Option<i64>,
    office: Option<String>,
    party: Option<String>,
    district: Option<String>,
    is_active: Option<bool>,
    #[serde(default)]
    has_fundraising: bool,
    #[serde(default)]
    include_stats: bool,
    sort_by: Option<String>,
    order: Option<String>,
    fields: Option<String>,
}

/// Shared body of the by-state routes. `office` overrides the `office`
/// parameter; `districts` replaces the single `district` filter.
async fn by_state(
    app: AppState,
    state: String,
    p: ByStateParams,
    office: Option<&str>,
    district: Option<String>,
) -> Result<Json<Value>, ApiError> {
    let state = validate_state(&state)?;
    let (page, page_size) = params::page(p.page, p.page_size, app.config.default_page_size, &app.config)?;
    let sort_by = parse_or(p.sort_by.as_deref(), CandidateSortBy::Name)?;
    let order = parse_or(p.order.as_deref(), SortDirection::Desc)?;

    let offices = match office {
        Some(o) => vec![o.to_string()],
        None => parse_code_list(p.office.as_deref()),
    };
    let mut query = CandidateQuery::default()
        .with_state(&state)
        .with_offices(&offices)
        .with_parties(&parse_code_list(p.party.as_deref()))
        .with_stats(p.include_stats)
        .with_has_fundraising(p.include_stats && p.has_fundraising)
        .with_sort_by(sort_by)
        .with_ordering(CandidateOrdering::Ranked)
        .with_sort_direction(order)
        .with_page(page)
        .with_page_size(page_size);
    if let Some(ref district) = district {
        query = query.with_district(&validate_district(district)?);
    }
    if let Some(is_active) = p.is_active {
        query = query.with_is_active(is_active);
    }

    let (items, total) = app.with_db(move |db| Ok(db.query_candidates(&query)?)).await?;
    paginated(
        items,
        PaginationMeta::new(page, page_size, total),
        &parse_fields(p.fields.as_deref()),
    )
}

async fn candidates_by_state(
    State(app): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    params: Result<Query<ByStateParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(state) = path?;
    let Query(p) = params?;
    let district = p.district.clone();
    by_state(app, state, p, None, district).await
}

async fn house_candidates(
    State(app): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    params: Result<Query<ByStateParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(state) = path?;
    let Query(p) = params?;
    let districts: Vec<String> = p
        .district
        .as_deref()
        .map(|d| {
            d.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    if districts.len() > 1 {
        return Err(ApiError::BadRequest(
            "Multiple district filtering not supported with pagination. \
             Please filter by a single district."
                .to_string(),
        ));
    }
    by_state(app, state, p, Some("H"), districts.into_iter().next()).await
}

async fn senate_candidates(
    State(app): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    params: Result<Query<ByStateParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(state) = path?;
    let Query(p) = params?;
    by_state(app, state, p, Some("S"), None).await
}

async fn get_candidate(
    State(app): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<CandidateDetail>, ApiError> {
    let Path(id) = path?;
    app.with_db(move |db| db.get_candidate(id)?.ok_or(ApiError::NotFound("Candidate not found")))
        .await
        .map(Json)
}

async fn candidate_stats(
    State(app): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<CandidateStats>, ApiError> {
    let Path(id) = path?;
    app.with_db(move |db| db.candidate_stats(id)?.ok_or(ApiError::NotFound("Candidate not found")))
        .await
        .map(Json)
}

async fn bulk_stats(
    State(app): State<AppState>,
    body: Result<Json<CandidateStatsBulkRequest>, JsonRejection>,
) -> Result<Json<CandidateStatsBulkResponse>, ApiError> {
    let Json(request) = body?;
    validate_ids("candidate_ids", &request.candidate_ids)?;
    let stats = app
        .with_db(move |db| Ok(db.bulk_candidate_stats(&request.candidate_ids)?))
        .await?;
    Ok(Json(CandidateStatsBulkResponse { stats }))
}

async fn batch_details(
    State(app): State<AppState>,
    body: Result<Json<CandidateBatchRequest>, JsonRejection>,
) -> Result<Json<CandidateBatchResponse>, ApiError> {
    let Json(request) = body?;
    validate_ids("ids", &request.ids)?;
    let candidates = app
        .with_db(move |db| Ok(db.batch_candidate_details(&request.ids, request.include_stats)?))
        .await?;
    Ok(Json(CandidateBatchResponse { candidates }))
}

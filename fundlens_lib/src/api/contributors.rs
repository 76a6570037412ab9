use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use fundlens_query::types::{
    ContributorContributionsResponse, ContributorDetail, ContributorList,
    ContributorRecipientsResponse, ContributorSearchAggregated, ContributorStats,
    PaginatedResponse, PaginationMeta, RecipientContributors, RecipientsMeta, TopContributor,
};
use fundlens_query::{
    ContributorContributionsQuery, ContributorContributionsSortBy, ContributorQuery,
    ContributorRecipientsQuery, ContributorRecipientsSortBy, ContributorSearchQuery,
    ContributorSearchSortBy, Query as _, Recipient, RecipientContributorsQuery, RecipientSortBy,
    SortDirection, TopContributorsQuery, MAX_PAGE_SIZE,
};

use crate::fields::parse_fields;
use crate::rate_limiter::Tier;
use crate::validation::{sanitize_text, validate_range, validate_search, MAX_SEARCH_LENGTH};

use super::params::{self, paginated, parse_or};
use super::{ApiError, AppState};

pub(super) fn routes(state: &AppState) -> Router<AppState> {
    let default = Router::new()
        .route("/", get(list_contributors))
        .route("/top", get(top_contributors))
        .route("/by-candidate/:candidate_id", get(contributors_by_candidate))
        .route("/by-committee/:committee_id", get(contributors_by_committee))
        .route("/:contributor_id", get(get_contributor))
        .route("/:contributor_id/contributions", get(contributor_contributions))
        .route("/:contributor_id/recipients", get(contributor_recipients));
    let search = Router::new()
        .route("/search", get(search_contributors))
        .route("/search/aggregated", get(search_aggregated));
    let stats = Router::new().route("/:contributor_id/stats", get(contributor_stats));

    state
        .limited(default, Tier::Default)
        .merge(state.limited(search, Tier::Search))
        .merge(state.limited(stats, Tier::Stats))
}

#[derive(Deserialize, Debug, Default)]
struct ListParams {
    page: Option<i64>,
    page_size: Option<i64>,
    q: Option<String>,
    state: Option<String>,
    city: Option<String>,
    entity_type: Option<String>,
    employer: Option<String>,
    occupation: Option<String>,
    fields: Option<String>,
}

/// Applies the filters shared by the list and search routes.
fn contributor_query(p: &ListParams, page: i64, page_size: i64) -> Result<ContributorQuery, ApiError> {
    let mut query = ContributorQuery::default()
        .with_page(page)
        .with_page_size(page_size);
    if let Some(state) = params::state(p.state.as_deref())? {
        query = query.with_state(&state);
    }
    if let Some(ref city) = p.city {
        query = query.with_city(&sanitize_text(city, MAX_SEARCH_LENGTH)?);
    }
    if let Some(entity_type) = params::code(p.entity_type.as_deref()) {
        query = query.with_entity_type(&entity_type);
    }
    if let Some(ref employer) = p.employer {
        query = query.with_employer(&sanitize_text(employer, MAX_SEARCH_LENGTH)?);
    }
    if let Some(ref occupation) = p.occupation {
        query = query.with_occupation(&sanitize_text(occupation, MAX_SEARCH_LENGTH)?);
    }
    Ok(query)
}

async fn list_contributors(
    State(app): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(p) = params?;
    let (page, page_size) = params::page(p.page, p.page_size, app.config.default_page_size, &app.config)?;
    let query = contributor_query(&p, page, page_size)?;
    let (items, total) = app.with_db(move |db| Ok(db.query_contributors(&query)?)).await?;
    paginated(
        items,
        PaginationMeta::new(page, page_size, total),
        &parse_fields(p.fields.as_deref()),
    )
}

async fn search_contributors(
    State(app): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<PaginatedResponse<ContributorList>>, ApiError> {
    let Query(p) = params?;
    let Some(ref q) = p.q else {
        return Err(ApiError::Unprocessable("q is required".to_string()));
    };
    let search = validate_search(q)?;
    let (page, page_size) = params::page(p.page, p.page_size, app.config.default_page_size, &app.config)?;
    let query = contributor_query(&p, page, page_size)?.with_search(&search);
    let (items, total) = app.with_db(move |db| Ok(db.query_contributors(&query)?)).await?;
    Ok(Json(PaginatedResponse::new(items, page, page_size, total)))
}

#[derive(Deserialize, Debug)]
struct AggregatedParams {
    q: String,
    page: Option<i64>,
    page_size: Option<i64>,
    state: Option<String>,
    entity_type: Option<String>,
    min_amount: Option<f64>,
    max_amount: Option<f64>,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
    sort_by: Option<String>,
    order: Option<String>,
}

async fn search_aggregated(
    State(app): State<AppState>,
    params: Result<Query<AggregatedParams>, QueryRejection>,
) -> Result<Json<PaginatedResponse<ContributorSearchAggregated>>, ApiError> {
    let Query(p) = params?;
    let search = validate_search(&p.q)?;
    let (page, page_size) = params::page(p.page, p.page_size, 25, &app.config)?;
    let sort_by = parse_or(p.sort_by.as_deref(), ContributorSearchSortBy::TotalAmount)?;
    let order = parse_or(p.order.as_deref(), SortDirection::Desc)?;

    let mut query = ContributorSearchQuery::new(&search)
        .with_sort_by(sort_by)
        .with_sort_direction(order)
        .with_page(page)
        .with_page_size(page_size);
    if let Some(state) = params::state(p.state.as_deref())? {
        query = query.with_state(&state);
    }
    if let Some(entity_type) = params::code(p.entity_type.as_deref()) {
        query = query.with_entity_type(&entity_type);
    }
    if let Some(min) = params::amount("min_amount", p.min_amount)? {
        query = query.with_min_amount(min);
    }
    if let Some(max) = params::amount("max_amount", p.max_amount)? {
        query = query.with_max_amount(max);
    }
    if let Some(from) = p.date_from {
        query = query.with_date_from(from);
    }
    if let Some(to) = p.date_to {
        query = query.with_date_to(to);
    }

    let (items, total) = app
        .with_db(move |db| Ok(db.search_contributors_aggregated(&query)?))
        .await?;
    Ok(Json(PaginatedResponse::new(items, page, page_size, total)))
}

#[derive(Deserialize, Debug)]
struct TopParams {
    limit: Option<i64>,
    state: Option<String>,
    entity_type: Option<String>,
}

async fn top_contributors(
    State(app): State<AppState>,
    params: Result<Query<TopParams>, QueryRejection>,
) -> Result<Json<PaginatedResponse<TopContributor>>, ApiError> {
    let Query(p) = params?;
    let limit = validate_range("limit", p.limit.unwrap_or(10), 1, MAX_PAGE_SIZE)?;

    let mut query = TopContributorsQuery::default().with_limit(limit);
    if let Some(state) = params::state(p.state.as_deref())? {
        query = query.with_state(&state);
    }
    if let Some(entity_type) = params::code(p.entity_type.as_deref()) {
        query = query.with_entity_type(&entity_type);
    }

    let (items, total) = app.with_db(move |db| Ok(db.top_contributors(&query)?)).await?;
    Ok(Json(PaginatedResponse::new(items, 1, limit, total)))
}

#[derive(Deserialize, Debug)]
struct RecipientParams {
    page: Option<i64>,
    page_size: Option<i64>,
    sort_by: Option<String>,
    order: Option<String>,
    min_amount: Option<f64>,
    max_amount: Option<f64>,
    state: Option<String>,
    entity_type: Option<String>,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
    search: Option<String>,
    #[serde(default)]
    include_contributions: bool,
}

async fn by_recipient(
    app: AppState,
    recipient: Recipient,
    p: RecipientParams,
    not_found: &'static str,
) -> Result<Json<RecipientContributors>, ApiError> {
    let (page, page_size) = params::page(p.page, p.page_size, 25, &app.config)?;
    let sort_by = parse_or(p.sort_by.as_deref(), RecipientSortBy::TotalAmount)?;
    let order = parse_or(p.order.as_deref(), SortDirection::Desc)?;

    let mut query = RecipientContributorsQuery::new(recipient)
        .with_sort_by(sort_by)
        .with_contributions(p.include_contributions)
        .with_sort_direction(order)
        .with_page(page)
        .with_page_size(page_size);
    if let Some(state) = params::state(p.state.as_deref())? {
        query = query.with_state(&state);
    }
    if let Some(entity_type) = params::code(p.entity_type.as_deref()) {
        query = query.with_entity_type(&entity_type);
    }
    if let Some(ref search) = p.search {
        query = query.with_search(&validate_search(search)?);
    }
    if let Some(min) = params::amount("min_amount", p.min_amount)? {
        query = query.with_min_amount(min);
    }
    if let Some(max) = params::amount("max_amount", p.max_amount)? {
        query = query.with_max_amount(max);
    }
    if let Some(from) = p.date_from {
        query = query.with_date_from(from);
    }
    if let Some(to) = p.date_to {
        query = query.with_date_to(to);
    }

    app.with_db(move |db| {
        db.contributors_by_recipient(&query)?
            .ok_or(ApiError::NotFound(not_found))
    })
    .await
    .map(Json)
}

async fn contributors_by_candidate(
    State(app): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    params: Result<Query<RecipientParams>, QueryRejection>,
) -> Result<Json<RecipientContributors>, ApiError> {
    let Path(id) = path?;
    let Query(p) = params?;
    by_recipient(app, Recipient::Candidate(id), p, "Candidate not found").await
}

async fn contributors_by_committee(
    State(app): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    params: Result<Query<RecipientParams>, QueryRejection>,
) -> Result<Json<RecipientContributors>, ApiError> {
    let Path(id) = path?;
    let Query(p) = params?;
    by_recipient(app, Recipient::Committee(id), p, "Committee not found").await
}

async fn get_contributor(
    State(app): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<ContributorDetail>, ApiError> {
    let Path(id) = path?;
    app.with_db(move |db| db.get_contributor(id)?.ok_or(ApiError::NotFound("Contributor not found")))
        .await
        .map(Json)
}

async fn contributor_stats(
    State(app): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<ContributorStats>, ApiError> {
    let Path(id) = path?;
    app.with_db(move |db| db.contributor_stats(id)?.ok_or(ApiError::NotFound("Contributor not found")))
        .await
        .map(Json)
}

#[derive(Deserialize, Debug)]
struct ContributionsParams {
    page_size: Option<i64>,
    sort_by: Option<String>,
    sort_direction: Option<String>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

async fn contributor_contributions(
    State(app): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    params: Result<Query<ContributionsParams>, QueryRejection>,
) -> Result<Json<ContributorContributionsResponse>, ApiError> {
    let Path(id) = path?;
    let Query(p) = params?;
    let limit = validate_range("page_size", p.page_size.unwrap_or(MAX_PAGE_SIZE), 1, MAX_PAGE_SIZE)?;
    let sort_by = parse_or(p.sort_by.as_deref(), ContributorContributionsSortBy::Amount)?;
    let direction = parse_or(p.sort_direction.as_deref(), SortDirection::Desc)?;

    let mut query = ContributorContributionsQuery::new(id)
        .with_limit(limit)
        .with_sort_by(sort_by)
        .with_sort_direction(direction);
    if let Some(start) = p.start_date {
        query = query.with_start_date(start);
    }
    if let Some(end) = p.end_date {
        query = query.with_end_date(end);
    }

    app.with_db(move |db| {
        if db.get_contributor(id)?.is_none() {
            return Err(ApiError::NotFound("Contributor not found"));
        }
        let contributions = db.contributor_contributions(&query)?;
        Ok(ContributorContributionsResponse { contributions })
    })
    .await
    .map(Json)
}

#[derive(Deserialize, Debug)]
struct RecipientsParams {
    sort_by: Option<String>,
    sort_direction: Option<String>,
}

async fn contributor_recipients(
    State(app): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    params: Result<Query<RecipientsParams>, QueryRejection>,
) -> Result<Json<ContributorRecipientsResponse>, ApiError> {
    let Path(id) = path?;
    let Query(p) = params?;
    let query = ContributorRecipientsQuery::new(id)
        .with_sort_by(parse_or(p.sort_by.as_deref(), ContributorRecipientsSortBy::TotalAmount)?)
        .with_sort_direction(parse_or(p.sort_direction.as_deref(), SortDirection::Desc)?);

    app.with_db(move |db| {
        if db.get_contributor(id)?.is_none() {
            return Err(ApiError::NotFound("Contributor not found"));
        }
        let (recipients, total_count) = db.contributor_recipients(&query)?;
        Ok(ContributorRecipientsResponse {
            recipients,
            meta: RecipientsMeta { total_count },
        })
    })
    .await
    .map(Json)
}

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use fundlens_query::types::{ContributionSummary, ContributionWithRelations, PaginationMeta};
use fundlens_query::{ContributionQuery, Query as _};

use crate::fields::parse_fields;
use crate::rate_limiter::Tier;

use super::params::{self, paginated};
use super::{ApiError, AppState};

pub(super) fn routes(state: &AppState) -> Router<AppState> {
    state.limited(
        Router::new()
            .route("/", get(list_contributions))
            .route("/summary", get(contribution_summary))
            .route("/by-contributor/:contributor_id", get(by_contributor))
            .route("/by-committee/:committee_id", get(by_committee))
            .route("/by-candidate/:candidate_id", get(by_candidate))
            .route("/:contribution_id", get(get_contribution)),
        Tier::Default,
    )
}

#[derive(Deserialize, Debug, Default)]
struct ContributionParams {
    page: Option<i64>,
    page_size: Option<i64>,
    contributor_id: Option<i64>,
    recipient_committee_id: Option<i64>,
    recipient_candidate_id: Option<i64>,
    contribution_type: Option<String>,
    election_type: Option<String>,
    election_year: Option<i64>,
    election_cycle: Option<i64>,
    source_system: Option<String>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    min_amount: Option<f64>,
    max_amount: Option<f64>,
    fields: Option<String>,
}

impl ContributionParams {
    fn to_query(&self) -> Result<ContributionQuery, ApiError> {
        let mut query = ContributionQuery::default();
        if let Some(id) = self.contributor_id {
            query = query.with_contributor_id(id);
        }
        if let Some(id) = self.recipient_committee_id {
            query = query.with_recipient_committee_id(id);
        }
        if let Some(id) = self.recipient_candidate_id {
            query = query.with_recipient_candidate_id(id);
        }
        if let Some(kind) = params::code(self.contribution_type.as_deref()) {
            query = query.with_contribution_type(&kind);
        }
        if let Some(kind) = params::code(self.election_type.as_deref()) {
            query = query.with_election_type(&kind);
        }
        if let Some(year) = self.election_year {
            query = query.with_election_year(year);
        }
        if let Some(cycle) = self.election_cycle {
            query = query.with_election_cycle(cycle);
        }
        if let Some(ref source) = self.source_system {
            query = query.with_source_system(source.trim());
        }
        if let Some(start) = self.start_date {
            query = query.with_start_date(start);
        }
        if let Some(end) = self.end_date {
            query = query.with_end_date(end);
        }
        if let Some(min) = params::amount("min_amount", self.min_amount)? {
            query = query.with_min_amount(min);
        }
        if let Some(max) = params::amount("max_amount", self.max_amount)? {
            query = query.with_max_amount(max);
        }
        Ok(query)
    }
}

async fn run_list(
    app: AppState,
    p: ContributionParams,
    query: ContributionQuery,
) -> Result<Json<Value>, ApiError> {
    let (page, page_size) = params::page(p.page, p.page_size, app.config.default_page_size, &app.config)?;
    let query = query.with_page(page).with_page_size(page_size);
    let (items, total) = app.with_db(move |db| Ok(db.query_contributions(&query)?)).await?;
    paginated(
        items,
        PaginationMeta::new(page, page_size, total),
        &parse_fields(p.fields.as_deref()),
    )
}

async fn list_contributions(
    State(app): State<AppState>,
    params: Result<Query<ContributionParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(p) = params?;
    let query = p.to_query()?;
    run_list(app, p, query).await
}

async fn contribution_summary(
    State(app): State<AppState>,
    params: Result<Query<ContributionParams>, QueryRejection>,
) -> Result<Json<ContributionSummary>, ApiError> {
    let Query(p) = params?;
    let query = p.to_query()?;
    let summary = app.with_db(move |db| Ok(db.contribution_summary(&query)?)).await?;
    Ok(Json(summary))
}

async fn get_contribution(
    State(app): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<ContributionWithRelations>, ApiError> {
    let Path(id) = path?;
    app.with_db(move |db| {
        db.get_contribution(id)?
            .ok_or(ApiError::NotFound("Contribution not found"))
    })
    .await
    .map(Json)
}

async fn by_contributor(
    State(app): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    params: Result<Query<ContributionParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(id) = path?;
    let Query(p) = params?;
    let query = p.to_query()?.with_contributor_id(id);
    run_list(app, p, query).await
}

async fn by_committee(
    State(app): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    params: Result<Query<ContributionParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(id) = path?;
    let Query(p) = params?;
    let query = p.to_query()?.with_recipient_committee_id(id);
    run_list(app, p, query).await
}

async fn by_candidate(
    State(app): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    params: Result<Query<ContributionParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(id) = path?;
    let Query(p) = params?;
    let query = p.to_query()?.with_recipient_candidate_id(id);
    run_list(app, p, query).await
}

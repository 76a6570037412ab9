use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use fundlens_query::types::{RaceResponse, StateSummary};
use fundlens_query::{Race, RaceQuery, StateSummaryQuery};

use crate::rate_limiter::Tier;
use crate::validation::{validate_district, validate_range, validate_state};

use super::{ApiError, AppState};

pub(super) fn race_routes(state: &AppState) -> Router<AppState> {
    state.limited(
        Router::new()
            .route("/presidential", get(presidential_race))
            .route("/:state/senate", get(senate_race))
            .route("/:state/house/:district", get(house_race)),
        Tier::Default,
    )
}

pub(super) fn state_routes(state: &AppState) -> Router<AppState> {
    state.limited(
        Router::new().route("/:state/summary", get(state_summary)),
        Tier::Default,
    )
}

#[derive(Deserialize, Debug)]
struct RaceParams {
    #[serde(default = "include_stats_default")]
    include_stats: bool,
}

fn include_stats_default() -> bool {
    true
}

async fn run_race(app: AppState, race: Race, include_stats: bool) -> Result<Json<RaceResponse>, ApiError> {
    let query = RaceQuery::new(race).with_stats(include_stats);
    app.with_db(move |db| db.race(&query)?.ok_or(ApiError::NotFound("Race not found")))
        .await
        .map(Json)
}

async fn presidential_race(
    State(app): State<AppState>,
    params: Result<Query<RaceParams>, QueryRejection>,
) -> Result<Json<RaceResponse>, ApiError> {
    let Query(p) = params?;
    run_race(app, Race::Presidential, p.include_stats).await
}

async fn senate_race(
    State(app): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    params: Result<Query<RaceParams>, QueryRejection>,
) -> Result<Json<RaceResponse>, ApiError> {
    let Path(state) = path?;
    let Query(p) = params?;
    let race = Race::Senate {
        state: validate_state(&state)?,
    };
    run_race(app, race, p.include_stats).await
}

async fn house_race(
    State(app): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
    params: Result<Query<RaceParams>, QueryRejection>,
) -> Result<Json<RaceResponse>, ApiError> {
    let Path((state, district)) = path?;
    let Query(p) = params?;
    let race = Race::House {
        state: validate_state(&state)?,
        district: validate_district(&district)?,
    };
    run_race(app, race, p.include_stats).await
}

#[derive(Deserialize, Debug)]
struct SummaryParams {
    top_n: Option<i64>,
}

async fn state_summary(
    State(app): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    params: Result<Query<SummaryParams>, QueryRejection>,
) -> Result<Json<StateSummary>, ApiError> {
    let Path(state) = path?;
    let Query(p) = params?;
    let state = validate_state(&state)?;
    let top_n = validate_range("top_n", p.top_n.unwrap_or(5), 1, 20)?;
    let query = StateSummaryQuery::new(&state).with_top_n(top_n);
    app.with_db(move |db| {
        db.state_summary(&query)?
            .ok_or(ApiError::NotFound("No candidates found for state"))
    })
    .await
    .map(Json)
}

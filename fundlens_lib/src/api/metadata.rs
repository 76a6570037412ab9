//! Distinct filter values for building UI pickers. Responses are cacheable
//! for an hour.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use fundlens_query::types::{LabeledCode, StateMetadata};

use crate::db::{Db, DbError};
use crate::labels::{committee_type_label, entity_type_label, office_label, state_name};
use crate::rate_limiter::Tier;

use super::{ApiError, AppState};

const CACHE_CONTROL: &str = "public, max-age=3600";

pub(super) fn routes(state: &AppState) -> Router<AppState> {
    state.limited(
        Router::new()
            .route("/states", get(all_states))
            .route("/contributors/states", get(contributor_states))
            .route("/contributors/entity-types", get(contributor_entity_types))
            .route("/committees/states", get(committee_states))
            .route("/committees/types", get(committee_types))
            .route("/candidates/states", get(candidate_states))
            .route("/candidates/offices", get(candidate_offices)),
        Tier::Default,
    )
}

/// Bare codes, or codes paired with a display name.
#[derive(Serialize, Debug)]
#[serde(untagged)]
enum CodeList {
    Codes(Vec<String>),
    States(Vec<StateMetadata>),
    Labeled(Vec<LabeledCode>),
}

impl CodeList {
    fn states(codes: Vec<String>, include_names: bool) -> Self {
        if !include_names {
            return CodeList::Codes(codes);
        }
        CodeList::States(
            codes
                .into_iter()
                .map(|code| StateMetadata {
                    name: state_name(&code),
                    code,
                })
                .collect(),
        )
    }

    fn labeled(codes: Vec<String>, include_labels: bool, label: fn(&str) -> String) -> Self {
        if !include_labels {
            return CodeList::Codes(codes);
        }
        CodeList::Labeled(
            codes
                .into_iter()
                .map(|code| LabeledCode {
                    label: label(&code),
                    code,
                })
                .collect(),
        )
    }
}

impl IntoResponse for CodeList {
    fn into_response(self) -> Response {
        ([(header::CACHE_CONTROL, CACHE_CONTROL)], Json(self)).into_response()
    }
}

#[derive(Deserialize, Debug)]
struct NamesParams {
    include_names: Option<bool>,
}

#[derive(Deserialize, Debug)]
struct LabelsParams {
    #[serde(default)]
    include_labels: bool,
}

async fn load(
    app: &AppState,
    fetch: fn(&Db) -> Result<Vec<String>, DbError>,
) -> Result<Vec<String>, ApiError> {
    app.with_db(move |db| Ok(fetch(db)?)).await
}

async fn all_states(
    State(app): State<AppState>,
    params: Result<Query<NamesParams>, QueryRejection>,
) -> Result<CodeList, ApiError> {
    let Query(p) = params?;
    let codes = load(&app, Db::all_states).await?;
    Ok(CodeList::states(codes, p.include_names.unwrap_or(true)))
}

async fn contributor_states(
    State(app): State<AppState>,
    params: Result<Query<NamesParams>, QueryRejection>,
) -> Result<CodeList, ApiError> {
    let Query(p) = params?;
    let codes = load(&app, Db::contributor_states).await?;
    Ok(CodeList::states(codes, p.include_names.unwrap_or(false)))
}

async fn committee_states(
    State(app): State<AppState>,
    params: Result<Query<NamesParams>, QueryRejection>,
) -> Result<CodeList, ApiError> {
    let Query(p) = params?;
    let codes = load(&app, Db::committee_states).await?;
    Ok(CodeList::states(codes, p.include_names.unwrap_or(false)))
}

async fn candidate_states(
    State(app): State<AppState>,
    params: Result<Query<NamesParams>, QueryRejection>,
) -> Result<CodeList, ApiError> {
    let Query(p) = params?;
    let codes = load(&app, Db::candidate_states).await?;
    Ok(CodeList::states(codes, p.include_names.unwrap_or(false)))
}

async fn contributor_entity_types(
    State(app): State<AppState>,
    params: Result<Query<LabelsParams>, QueryRejection>,
) -> Result<CodeList, ApiError> {
    let Query(p) = params?;
    let codes = load(&app, Db::contributor_entity_types).await?;
    Ok(CodeList::labeled(codes, p.include_labels, entity_type_label))
}

async fn committee_types(
    State(app): State<AppState>,
    params: Result<Query<LabelsParams>, QueryRejection>,
) -> Result<CodeList, ApiError> {
    let Query(p) = params?;
    let codes = load(&app, Db::committee_types).await?;
    Ok(CodeList::labeled(codes, p.include_labels, committee_type_label))
}

async fn candidate_offices(
    State(app): State<AppState>,
    params: Result<Query<LabelsParams>, QueryRejection>,
) -> Result<CodeList, ApiError> {
    let Query(p) = params?;
    let codes = load(&app, Db::candidate_offices).await?;
    Ok(CodeList::labeled(codes, p.include_labels, office_label))
}

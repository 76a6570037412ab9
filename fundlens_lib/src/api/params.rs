//! Parameter normalization shared by the route modules.

use std::str::FromStr;

use axum::Json;
use serde::Serialize;
use serde_json::Value;

use fundlens_query::types::{PaginatedResponse, PaginationMeta};

use crate::config::Config;
use crate::fields::select_items;
use crate::validation::{
    normalize_code, validate_amount, validate_page, validate_page_size, validate_state,
};

use super::ApiError;

/// Resolve `page` and `page_size` against the configured bounds.
pub(super) fn page(
    page: Option<i64>,
    page_size: Option<i64>,
    default_size: i64,
    config: &Config,
) -> Result<(i64, i64), ApiError> {
    let page = validate_page(page.unwrap_or(1))?;
    let size = validate_page_size(page_size.unwrap_or(default_size), config.max_page_size)?;
    Ok((page, size))
}

pub(super) fn state(value: Option<&str>) -> Result<Option<String>, ApiError> {
    match value.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => Ok(Some(validate_state(s)?)),
        None => Ok(None),
    }
}

/// Uppercased code, or `None` when blank.
pub(super) fn code(value: Option<&str>) -> Option<String> {
    value.map(normalize_code).filter(|s| !s.is_empty())
}

pub(super) fn amount(name: &str, value: Option<f64>) -> Result<Option<f64>, ApiError> {
    value.map(|v| validate_amount(name, v)).transpose().map_err(ApiError::from)
}

/// Parse a sort field or direction, falling back to `default` when absent.
pub(super) fn parse_or<T>(value: Option<&str>, default: T) -> Result<T, ApiError>
where
    T: FromStr<Err = fundlens_query::Error>,
{
    match value {
        Some(v) => Ok(v.parse()?),
        None => Ok(default),
    }
}

/// A paginated body, projected onto `fields` when any were requested.
pub(super) fn paginated<T: Serialize>(
    items: Vec<T>,
    meta: PaginationMeta,
    fields: &[String],
) -> Result<Json<Value>, ApiError> {
    let body = if fields.is_empty() {
        serde_json::to_value(PaginatedResponse { items, meta })
    } else {
        let items = select_items(&items, fields)?;
        serde_json::to_value(PaginatedResponse { items, meta })
    };
    body.map(Json)
        .map_err(|e| ApiError::Internal(format!("serialization failed: {e}")))
}

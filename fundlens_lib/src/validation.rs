//! Request parameter validation and normalization.
//!
//! Every check returns [`FundLensError::InvalidInput`], which the HTTP layer
//! reports as 422.

use crate::error::FundLensError;

pub const MAX_SEARCH_LENGTH: usize = 500;
pub const MAX_DISTRICT_LENGTH: usize = 8;
pub const MAX_BATCH_IDS: usize = 100;

pub const VALID_STATES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT",
    "VA", "WA", "WV", "WI", "WY", "DC", "AS", "GU", "MP", "PR", "VI",
];

/// Strip ASCII control characters (except space), trim whitespace,
/// and enforce a byte-length limit.
pub fn sanitize_text(input: &str, max_len: usize) -> Result<String, FundLensError> {
    if input.len() > max_len {
        return Err(FundLensError::InvalidInput(format!(
            "input exceeds maximum length of {} characters",
            max_len
        )));
    }
    let sanitized: String = input
        .chars()
        .filter(|c| !c.is_ascii_control() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string();
    if sanitized.is_empty() {
        return Err(FundLensError::InvalidInput(
            "input is empty after sanitization".to_string(),
        ));
    }
    Ok(sanitized)
}

/// Validate a search term (`q`): 1..=500 characters after trimming.
pub fn validate_search(input: &str) -> Result<String, FundLensError> {
    sanitize_text(input, MAX_SEARCH_LENGTH)
}

/// Normalize a state code to uppercase. Any two-letter code is accepted;
/// codes with no data simply match nothing.
pub fn validate_state(input: &str) -> Result<String, FundLensError> {
    let upper = input.trim().to_ascii_uppercase();
    if upper.len() == 2 && upper.chars().all(|c| c.is_ascii_alphabetic()) {
        if !is_known_state(&upper) {
            tracing::debug!(state = %upper, "unrecognized state code");
        }
        Ok(upper)
    } else {
        Err(FundLensError::InvalidInput(format!(
            "invalid state code '{}'. Expected a two-letter code such as MD",
            input
        )))
    }
}

/// True when `code` is one of the 50 states, DC or a territory.
pub fn is_known_state(code: &str) -> bool {
    VALID_STATES.contains(&code)
}

/// Uppercase a short code (party, office, entity or committee type).
pub fn normalize_code(input: &str) -> String {
    input.trim().to_ascii_uppercase()
}

/// Split a comma-separated code list, dropping blanks and uppercasing.
pub fn parse_code_list(input: Option<&str>) -> Vec<String> {
    input
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| s.to_ascii_uppercase())
                .collect()
        })
        .unwrap_or_default()
}

pub fn validate_district(input: &str) -> Result<String, FundLensError> {
    sanitize_text(input, MAX_DISTRICT_LENGTH)
}

/// Validate page number (must be >= 1).
pub fn validate_page(page: i64) -> Result<i64, FundLensError> {
    if page < 1 {
        return Err(FundLensError::InvalidInput(
            "page must be >= 1".to_string(),
        ));
    }
    Ok(page)
}

/// Validate page size against the configured maximum.
pub fn validate_page_size(page_size: i64, max: i64) -> Result<i64, FundLensError> {
    validate_range("page_size", page_size, 1, max)
}

/// Validate an integer parameter against an inclusive range.
pub fn validate_range(name: &str, value: i64, min: i64, max: i64) -> Result<i64, FundLensError> {
    if !(min..=max).contains(&value) {
        return Err(FundLensError::InvalidInput(format!(
            "{} must be between {} and {}",
            name, min, max
        )));
    }
    Ok(value)
}

/// Money filters must not be negative.
pub fn validate_amount(name: &str, value: f64) -> Result<f64, FundLensError> {
    if !value.is_finite() || value < 0.0 {
        return Err(FundLensError::InvalidInput(format!(
            "{} must be >= 0",
            name
        )));
    }
    Ok(value)
}

/// Batch endpoints take between 1 and 100 ids.
pub fn validate_ids(name: &str, ids: &[i64]) -> Result<(), FundLensError> {
    if ids.is_empty() || ids.len() > MAX_BATCH_IDS {
        return Err(FundLensError::InvalidInput(format!(
            "{} must contain between 1 and {} ids",
            name, MAX_BATCH_IDS
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;

//! Sparse field selection (`?fields=id,name,stats.total_amount`).

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::FundLensError;

/// Parse a comma-separated `fields` parameter. An empty result means
/// "return every field".
pub fn parse_fields(input: Option<&str>) -> Vec<String> {
    let mut fields: Vec<String> = Vec::new();
    for f in input.unwrap_or_default().split(',').map(str::trim) {
        if !f.is_empty() && !fields.iter().any(|existing| existing == f) {
            fields.push(f.to_string());
        }
    }
    fields
}

/// Project a JSON object onto the requested fields.
///
/// A plain key is copied as is. `parent.child` copies one key of a nested
/// object; if `parent` is not an object its whole value is copied. Keys
/// missing from `value` are skipped, and non-object values pass through.
pub fn select(value: &Value, fields: &[String]) -> Value {
    let Value::Object(source) = value else {
        return value.clone();
    };
    if fields.is_empty() {
        return value.clone();
    }

    let mut out = Map::new();
    for field in fields {
        match field.split_once('.') {
            None => {
                if let Some(v) = source.get(field) {
                    out.insert(field.clone(), v.clone());
                }
            }
            Some((parent, child)) => {
                let Some(parent_value) = source.get(parent) else {
                    continue;
                };
                match parent_value {
                    Value::Object(nested) => {
                        let slot = out
                            .entry(parent.to_string())
                            .or_insert_with(|| Value::Object(Map::new()));
                        if !slot.is_object() {
                            *slot = Value::Object(Map::new());
                        }
                        if let (Some(v), Value::Object(target)) = (nested.get(child), slot) {
                            target.insert(child.to_string(), v.clone());
                        }
                    }
                    other => {
                        out.entry(parent.to_string())
                            .or_insert_with(|| other.clone());
                    }
                }
            }
        }
    }
    Value::Object(out)
}

/// Serialize each item and project it onto `fields`.
pub fn select_items<T: Serialize>(
    items: &[T],
    fields: &[String],
) -> Result<Vec<Value>, FundLensError> {
    items
        .iter()
        .map(|item| Ok(select(&serde_json::to_value(item)?, fields)))
        .collect()
}

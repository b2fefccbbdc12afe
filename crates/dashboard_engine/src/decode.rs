use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::UploadReply;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unexpected response body: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<Value>,
}

/// Decodes a success body.
///
/// Only a body that is not JSON at all is an error. Every field is optional:
/// a missing or non-string `message` becomes empty, and list or map entries
/// that are not strings are skipped.
pub fn decode_reply(body: &[u8]) -> Result<UploadReply, DecodeError> {
    let value: Value = serde_json::from_slice(body)?;
    let Some(fields) = value.as_object() else {
        return Ok(UploadReply::default());
    };
    Ok(UploadReply {
        message: fields
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        insights: string_list(fields, "insights"),
        mapped_columns: string_map(fields, "mapped_columns"),
        final_columns: string_list(fields, "final_columns"),
    })
}

fn string_list(fields: &Map<String, Value>, key: &str) -> Vec<String> {
    match fields.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Pairs sorted by uploaded column name.
fn string_map(fields: &Map<String, Value>, key: &str) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = match fields.get(key) {
        Some(Value::Object(entries)) => entries
            .iter()
            .filter_map(|(from, to)| Some((from.clone(), to.as_str()?.to_string())))
            .collect(),
        _ => Vec::new(),
    };
    pairs.sort();
    pairs
}

/// Extracts the `error` string of a failure body, if the body carries one.
pub fn decode_error_body(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    match parsed.error? {
        Value::String(error) if !error.trim().is_empty() => Some(error),
        _ => None,
    }
}

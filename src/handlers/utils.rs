use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query};
use axum::Json;
use serde_json::Value;

use crate::error::ApiError;

/// Parse a path or query id; anything but a positive integer is a 400.
pub fn parse_id(name: &str, raw: &str) -> Result<i32, ApiError> {
    match raw.trim().parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(not_positive(name)),
    }
}

fn not_positive(name: &str) -> ApiError {
    ApiError::bad_request(format!("{} must be a positive integer", name))
}

/// The `:id` path segment as a positive integer.
pub fn path_id(path: Result<Path<String>, PathRejection>) -> Result<i32, ApiError> {
    let Path(raw) = path.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    parse_id("id", &raw)
}

/// An id in a JSON body, given either as a number or a numeric string.
pub fn body_id(name: &str, value: Option<Value>) -> Result<i32, ApiError> {
    match value {
        None => Err(ApiError::bad_request(format!("{} is required", name))),
        Some(Value::String(raw)) => parse_id(name, &raw),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .filter(|n| *n > 0)
            .ok_or_else(|| not_positive(name)),
        Some(_) => Err(not_positive(name)),
    }
}

/// Unwrap query parameters, turning axum's plain-text rejection into a JSON 400.
pub fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

/// Unwrap a JSON body, turning axum's plain-text rejection into a JSON 400.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

/// Require a non-blank string field.
pub fn required(field: Option<String>, name: &str) -> Result<String, ApiError> {
    match field {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ApiError::bad_request(format!("{} is required", name))),
    }
}

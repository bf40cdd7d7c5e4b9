use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Json, Path, Query};
use serde_json::Value;

use crate::error::ApiError;

/// Unwrap a JSON body, turning axum's rejection into our 400 shape
pub fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    body.map(|Json(v)| v).map_err(|e| ApiError::bad_request(e.body_text()))
}

/// Unwrap a query string, turning axum's rejection into our 400 shape
pub fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query.map(|Query(q)| q).map_err(|e| ApiError::bad_request(e.body_text()))
}

/// Unwrap a path parameter, turning axum's rejection into our 400 shape
pub fn path_param<T>(path: Result<Path<T>, PathRejection>) -> Result<T, ApiError> {
    path.map(|Path(p)| p).map_err(|e| ApiError::bad_request(e.body_text()))
}

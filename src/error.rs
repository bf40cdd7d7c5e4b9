// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::database::{DatabaseError, RecordError};
use crate::sql::ClauseError;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::NotFound(_) => 404,
            ApiError::InternalServerError(_) => 500,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({
            "error": {
                "message": self.message(),
                "status": self.status_code()
            }
        })
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized() -> Self {
        ApiError::Unauthorized("Unauthorized".to_string())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

impl From<RecordError> for ApiError {
    fn from(err: RecordError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

impl From<ClauseError> for ApiError {
    fn from(err: ClauseError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        if err.is_unavailable() {
            tracing::error!("Database unavailable: {}", err);
            return ApiError::service_unavailable("Database temporarily unavailable");
        }
        match err {
            DatabaseError::NotFound(msg) => ApiError::not_found(msg),
            DatabaseError::Duplicate(msg) => ApiError::bad_request(msg),
            DatabaseError::Clause(e) => e.into(),
            DatabaseError::Sqlx(sqlx::Error::Database(db_err)) if is_client_data_error(db_err.code().as_deref()) => {
                // Constraint or data violations come from the request, but don't leak SQL details
                tracing::warn!("Rejected by database: {}", db_err);
                ApiError::bad_request("Invalid data")
            }
            other => {
                // Log the real error but return generic message
                tracing::error!("Database error: {}", other);
                ApiError::internal_server_error("Database error occurred")
            }
        }
    }
}

/// SQLSTATE classes 22 (data exception) and 23 (integrity constraint violation)
fn is_client_data_error(code: Option<&str>) -> bool {
    code.is_some_and(|c| c.starts_with("22") || c.starts_with("23"))
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_body_matches_client_contract() {
        let err = ApiError::unauthorized();
        assert_eq!(err.status_code(), 401);
        assert_eq!(err.to_json(), json!({ "error": { "message": "Unauthorized", "status": 401 } }));
    }

    #[test]
    fn clause_errors_are_bad_requests() {
        let err: ApiError = DatabaseError::Clause(ClauseError::RangeConflict { lower: 3, upper: 1 }).into();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.message(), "Minimum (3) can't be greater than maximum (1)");

        let err: ApiError = ClauseError::EmptyInput.into();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn not_found_and_duplicate_map_through() {
        let err: ApiError = DatabaseError::NotFound("No job: 0".into()).into();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.message(), "No job: 0");

        let err: ApiError = DatabaseError::Duplicate("Duplicate company: c1".into()).into();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn connection_problems_are_unavailable() {
        let err: ApiError = DatabaseError::Sqlx(sqlx::Error::PoolTimedOut).into();
        assert_eq!(err.status_code(), 503);

        let err: ApiError = DatabaseError::Sqlx(sqlx::Error::RowNotFound).into();
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn classifies_sqlstate() {
        assert!(is_client_data_error(Some("23503")));
        assert!(is_client_data_error(Some("22P02")));
        assert!(!is_client_data_error(Some("42P01")));
        assert!(!is_client_data_error(None));
    }
}

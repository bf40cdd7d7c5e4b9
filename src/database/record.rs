use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Errors raised while checking a request body against a model's shape
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Invalid JSON format: {0}")]
    InvalidJson(String),
    #[error("Field '{0}' cannot be set")]
    FieldNotAllowed(String),
    #[error("Invalid value for '{field}': {reason}")]
    InvalidField { field: String, reason: String },
}

impl RecordError {
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        RecordError::InvalidField { field: field.to_string(), reason: reason.into() }
    }
}

/// Semantic checks that serde's type checks can't express
pub trait Validate {
    fn validate(&self) -> Result<(), RecordError>;
}

/// Deserialize and validate a request body
pub fn parse_body<T: DeserializeOwned + Validate>(body: Value) -> Result<T, RecordError> {
    let parsed: T = serde_json::from_value(body).map_err(|e| RecordError::InvalidJson(e.to_string()))?;
    parsed.validate()?;
    Ok(parsed)
}

/// Turn a PATCH body into the ordered field map for a partial update.
///
/// Keys outside `allowed` are rejected, as are explicit nulls for `not_null`
/// columns. The typed view `T` checks value types; the map keeps the
/// caller's key order and explicit nulls.
pub fn field_map<T: DeserializeOwned + Validate>(
    body: Value,
    allowed: &[&str],
    not_null: &[&str],
) -> Result<Map<String, Value>, RecordError> {
    let map = match body {
        Value::Object(map) => map,
        _ => return Err(RecordError::InvalidJson("expected a JSON object".to_string())),
    };

    for (key, value) in &map {
        if !allowed.contains(&key.as_str()) {
            return Err(RecordError::FieldNotAllowed(key.clone()));
        }
        if value.is_null() && not_null.contains(&key.as_str()) {
            return Err(RecordError::invalid(key, "cannot be null"));
        }
    }

    parse_body::<T>(Value::Object(map.clone()))?;
    Ok(map)
}

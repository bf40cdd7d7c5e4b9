use serde_json::{Map, Value};

use super::error::ClauseError;
use super::resolve_column;
use super::types::{ClauseResult, ColumnMap};

/// Build the `SET` list for a partial update.
///
/// Each key of `data` becomes `"<column>"=$i`, numbered from 1 in the map's
/// iteration order, and `values` carries the map's values in that same order.
/// Values are passed through untouched, so a JSON `null` clears its column.
///
/// ```text
/// data    {"firstName": "Aliya", "age": 32}
/// columns [("firstName", "first_name")]
/// clause  "first_name"=$1, "age"=$2
/// values  ["Aliya", 32]
/// ```
pub fn sql_for_partial_update(data: &Map<String, Value>, columns: &ColumnMap) -> Result<ClauseResult, ClauseError> {
    if data.is_empty() {
        return Err(ClauseError::EmptyInput);
    }

    let mut fragments = Vec::with_capacity(data.len());
    let mut values = Vec::with_capacity(data.len());
    for (idx, (key, value)) in data.iter().enumerate() {
        fragments.push(format!("\"{}\"=${}", resolve_column(columns, key), idx + 1));
        values.push(value.clone());
    }

    Ok(ClauseResult { clause: fragments.join(", "), values })
}

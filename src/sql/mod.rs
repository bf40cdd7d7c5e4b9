pub mod types;
pub mod partial_update;
pub mod filtering;
pub mod error;

pub use types::*;
pub use error::ClauseError;
pub use partial_update::sql_for_partial_update;
pub use filtering::sql_for_filtering;

/// Storage column for a logical field name, falling back to the name itself
/// when the table has no entry for it.
pub fn resolve_column<'a>(columns: &'a ColumnMap, key: &'a str) -> &'a str {
    columns
        .iter()
        .find(|(field, _)| *field == key)
        .map(|(_, column)| *column)
        .unwrap_or(key)
}

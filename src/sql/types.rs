use serde_json::Value;

/// Pairs of (logical field name, storage column name). Fields missing from
/// the table are used verbatim as column names.
pub type ColumnMap = [(&'static str, &'static str)];

/// A clause fragment with its positional parameters. Placeholder `$i` in
/// `clause` binds `values[i - 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClauseResult {
    pub clause: String,
    pub values: Vec<Value>,
}

impl ClauseResult {
    /// Index a caller should use for the first parameter it appends after the
    /// built clause (e.g. a primary key in `WHERE id = $n`).
    pub fn next_placeholder(&self) -> usize {
        self.values.len() + 1
    }
}

/// Filter query for one entity: a substring match plus an exclusive numeric range.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub text: Option<String>,
    pub lower: Option<i64>,
    pub upper: Option<i64>,
}

impl FilterCriteria {
    /// True when no criterion would contribute a fragment.
    pub fn is_empty(&self) -> bool {
        self.text.as_deref().map_or(true, str::is_empty) && self.lower.is_none() && self.upper.is_none()
    }
}

/// Request-facing key names feeding each criterion. The text key doubles as
/// the matched column.
#[derive(Debug, Clone, Copy)]
pub struct FilterFields {
    pub text: &'static str,
    pub lower: &'static str,
    pub upper: &'static str,
}

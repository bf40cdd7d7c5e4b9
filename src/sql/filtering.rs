use serde_json::Value;

use super::error::ClauseError;
use super::resolve_column;
use super::types::{ClauseResult, ColumnMap, FilterCriteria, FilterFields};

/// Build the `WHERE` condition for a filtered listing.
///
/// Criteria are emitted in a fixed order (text match, lower bound, upper
/// bound) and numbered contiguously from `$1`; absent criteria leave no gap.
/// The text key is matched as a bare column with `ILIKE '%value%'`. Bound
/// keys resolve through `columns` and compare strictly.
pub fn sql_for_filtering(
    criteria: &FilterCriteria,
    fields: &FilterFields,
    columns: &ColumnMap,
) -> Result<ClauseResult, ClauseError> {
    if criteria.is_empty() {
        return Err(ClauseError::EmptyInput);
    }
    if let (Some(lower), Some(upper)) = (criteria.lower, criteria.upper) {
        if lower > upper {
            return Err(ClauseError::RangeConflict { lower, upper });
        }
    }

    let mut fragments = Vec::new();
    let mut values = Vec::new();

    if let Some(text) = criteria.text.as_deref().filter(|t| !t.is_empty()) {
        values.push(Value::String(format!("%{}%", text)));
        fragments.push(format!("{} ILIKE ${}", fields.text, values.len()));
    }
    if let Some(lower) = criteria.lower {
        values.push(Value::from(lower));
        fragments.push(format!("\"{}\">${}", resolve_column(columns, fields.lower), values.len()));
    }
    if let Some(upper) = criteria.upper {
        values.push(Value::from(upper));
        fragments.push(format!("\"{}\"<${}", resolve_column(columns, fields.upper), values.len()));
    }

    Ok(ClauseResult { clause: fragments.join(" AND "), values })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FIELDS: FilterFields = FilterFields { text: "name", lower: "minEmployees", upper: "maxEmployees" };
    const COLUMNS: &ColumnMap = &[("minEmployees", "num_employees"), ("maxEmployees", "num_employees")];

    fn criteria(text: Option<&str>, lower: Option<i64>, upper: Option<i64>) -> FilterCriteria {
        FilterCriteria { text: text.map(str::to_string), lower, upper }
    }

    #[test]
    fn empty_criteria_is_rejected() {
        let err = sql_for_filtering(&FilterCriteria::default(), &FIELDS, COLUMNS).unwrap_err();
        assert_eq!(err, ClauseError::EmptyInput);
    }

    #[test]
    fn blank_text_counts_as_absent() {
        let err = sql_for_filtering(&criteria(Some(""), None, None), &FIELDS, COLUMNS).unwrap_err();
        assert_eq!(err, ClauseError::EmptyInput);
    }

    #[test]
    fn text_match_only() {
        let result = sql_for_filtering(&criteria(Some("C1"), None, None), &FIELDS, COLUMNS).unwrap();
        assert_eq!(result.clause, "name ILIKE $1");
        assert_eq!(result.values, vec![json!("%C1%")]);
    }

    #[test]
    fn all_criteria_in_fixed_order() {
        let result = sql_for_filtering(&criteria(Some("C1"), Some(1), Some(3)), &FIELDS, COLUMNS).unwrap();
        assert_eq!(result.clause, r#"name ILIKE $1 AND "num_employees">$2 AND "num_employees"<$3"#);
        assert_eq!(result.values, vec![json!("%C1%"), json!(1), json!(3)]);
    }

    #[test]
    fn bounds_without_text_start_at_one() {
        let result = sql_for_filtering(&criteria(None, Some(2), None), &FIELDS, COLUMNS).unwrap();
        assert_eq!(result.clause, r#""num_employees">$1"#);
        assert_eq!(result.values, vec![json!(2)]);

        let result = sql_for_filtering(&criteria(Some("net"), None, Some(50)), &FIELDS, COLUMNS).unwrap();
        assert_eq!(result.clause, r#"name ILIKE $1 AND "num_employees"<$2"#);
        assert_eq!(result.values, vec![json!("%net%"), json!(50)]);
    }

    #[test]
    fn zero_bound_is_present() {
        let result = sql_for_filtering(&criteria(None, Some(0), None), &FIELDS, COLUMNS).unwrap();
        assert_eq!(result.clause, r#""num_employees">$1"#);
        assert_eq!(result.values, vec![json!(0)]);
    }

    #[test]
    fn conflicting_bounds_are_rejected() {
        let err = sql_for_filtering(&criteria(None, Some(3), Some(1)), &FIELDS, COLUMNS).unwrap_err();
        assert_eq!(err, ClauseError::RangeConflict { lower: 3, upper: 1 });
    }

    #[test]
    fn equal_bounds_are_allowed() {
        let result = sql_for_filtering(&criteria(None, Some(2), Some(2)), &FIELDS, COLUMNS).unwrap();
        assert_eq!(result.values.len(), 2);
    }

    #[test]
    fn untranslated_bound_uses_key() {
        let fields = FilterFields { text: "title", lower: "minSalary", upper: "maxSalary" };
        let result = sql_for_filtering(&criteria(Some("eng"), Some(10), None), &fields, &[]).unwrap();
        assert_eq!(result.clause, r#"title ILIKE $1 AND "minSalary">$2"#);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let c = criteria(Some("C"), Some(1), Some(9));
        assert_eq!(
            sql_for_filtering(&c, &FIELDS, COLUMNS).unwrap(),
            sql_for_filtering(&c, &FIELDS, COLUMNS).unwrap()
        );
    }
}

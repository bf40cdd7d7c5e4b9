use serde_json::{Number, Value};
use sqlx::{postgres::{PgArguments, PgRow}, FromRow, Postgres};

type PgQueryAs<'q, O> = sqlx::query::QueryAs<'q, Postgres, O, PgArguments>;

/// Bind clause values in placeholder order
pub fn bind_values<'q, O>(mut q: PgQueryAs<'q, O>, values: &'q [Value]) -> PgQueryAs<'q, O>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    for v in values {
        q = bind_value(q, v);
    }
    q
}

fn bind_value<'q, O>(q: PgQueryAs<'q, O>, v: &'q Value) -> PgQueryAs<'q, O>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    match v {
        Value::Null => {
            // int4 NULL assigns cleanly to integer, numeric and text columns
            let none: Option<i32> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => match number_param(n) {
            NumberParam::Int(i) => q.bind(i),
            NumberParam::Float(f) => q.bind(f),
            NumberParam::Text(t) => q.bind(t),
        },
        Value::String(s) => q.bind(s.as_str()),
        Value::Array(_) | Value::Object(_) => q.bind(v.clone()), // JSONB
    }
}

#[derive(Debug, PartialEq)]
enum NumberParam {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Postgres has no u64; integers past i64::MAX go over as text so the
/// server rejects or casts them instead of seeing a wrapped negative.
fn number_param(n: &Number) -> NumberParam {
    if let Some(i) = n.as_i64() {
        NumberParam::Int(i)
    } else if n.is_u64() {
        NumberParam::Text(n.to_string())
    } else if let Some(f) = n.as_f64() {
        NumberParam::Float(f)
    } else {
        NumberParam::Text(n.to_string())
    }
}

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::{FromRow, PgPool};
use tracing::debug;

use crate::database::manager::DatabaseError;
use crate::database::params::bind_values;
use crate::database::record::{RecordError, Validate};
use crate::sql::{sql_for_filtering, sql_for_partial_update, ColumnMap, FilterCriteria, FilterFields};

const COLUMNS: &str = "id, title, salary, equity, company_handle";

const JS_TO_SQL: &ColumnMap = &[
    ("companyHandle", "company_handle"),
    ("minSalary", "salary"),
    ("maxSalary", "salary"),
];

pub const FILTER_FIELDS: FilterFields = FilterFields {
    text: "title",
    lower: "minSalary",
    upper: "maxSalary",
};

/// A job stays with the company it was posted under
pub const UPDATABLE: &[&str] = &["title", "salary", "equity"];
pub const NOT_NULL: &[&str] = &["title"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

/// Job as listed under its company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct JobSummary {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewJob {
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<f64>,
    pub company_handle: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobUpdate {
    pub title: Option<String>,
    pub salary: Option<i32>,
    pub equity: Option<f64>,
}

fn check_common(title: Option<&str>, salary: Option<i32>, equity: Option<f64>) -> Result<(), RecordError> {
    if title.is_some_and(str::is_empty) {
        return Err(RecordError::invalid("title", "must not be empty"));
    }
    if salary.is_some_and(|s| s < 0) {
        return Err(RecordError::invalid("salary", "must be >= 0"));
    }
    if equity.is_some_and(|e| !(0.0..=1.0).contains(&e)) {
        return Err(RecordError::invalid("equity", "must be between 0 and 1"));
    }
    Ok(())
}

impl Validate for NewJob {
    fn validate(&self) -> Result<(), RecordError> {
        if self.company_handle.is_empty() {
            return Err(RecordError::invalid("companyHandle", "must not be empty"));
        }
        check_common(Some(&self.title), self.salary, self.equity)
    }
}

impl Validate for JobUpdate {
    fn validate(&self) -> Result<(), RecordError> {
        check_common(self.title.as_deref(), self.salary, self.equity)
    }
}

impl Job {
    pub async fn create(pool: &PgPool, data: NewJob) -> Result<Job, DatabaseError> {
        let sql = format!(
            "INSERT INTO jobs (title, salary, equity, company_handle)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(&data.title)
            .bind(data.salary)
            .bind(data.equity)
            .bind(&data.company_handle)
            .fetch_one(pool)
            .await?;
        Ok(job)
    }

    /// All jobs, ordered by title
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Job>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM jobs ORDER BY title");
        Ok(sqlx::query_as::<_, Job>(&sql).fetch_all(pool).await?)
    }

    /// Jobs matching `criteria`, ordered by title
    pub async fn filter(pool: &PgPool, criteria: &FilterCriteria) -> Result<Vec<Job>, DatabaseError> {
        let (sql, values) = Self::filter_statement(criteria)?;
        debug!("Job filter: {}", sql);
        let rows = bind_values(sqlx::query_as::<_, Job>(&sql), &values).fetch_all(pool).await?;
        Ok(rows)
    }

    pub async fn get(pool: &PgPool, id: i32) -> Result<Job, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM jobs WHERE id = $1");
        sqlx::query_as::<_, Job>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| Self::not_found(id))
    }

    /// Partial update: only the fields present in `data` change
    pub async fn update(pool: &PgPool, id: i32, data: &Map<String, Value>) -> Result<Job, DatabaseError> {
        let (sql, values) = Self::update_statement(data)?;
        debug!("Job update: {}", sql);
        bind_values(sqlx::query_as::<_, Job>(&sql), &values)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| Self::not_found(id))
    }

    pub async fn remove(pool: &PgPool, id: i32) -> Result<(), DatabaseError> {
        let deleted: Option<(i32,)> = sqlx::query_as("DELETE FROM jobs WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        deleted.map(|_| ()).ok_or_else(|| Self::not_found(id))
    }

    fn update_statement(data: &Map<String, Value>) -> Result<(String, Vec<Value>), DatabaseError> {
        let set = sql_for_partial_update(data, JS_TO_SQL)?;
        let sql = format!(
            "UPDATE jobs SET {} WHERE id = ${} RETURNING {COLUMNS}",
            set.clause,
            set.next_placeholder()
        );
        Ok((sql, set.values))
    }

    fn filter_statement(criteria: &FilterCriteria) -> Result<(String, Vec<Value>), DatabaseError> {
        let filter = sql_for_filtering(criteria, &FILTER_FIELDS, JS_TO_SQL)?;
        let sql = format!("SELECT {COLUMNS} FROM jobs WHERE {} ORDER BY title", filter.clause);
        Ok((sql, filter.values))
    }

    fn not_found(id: i32) -> DatabaseError {
        DatabaseError::NotFound(format!("No job: {}", id))
    }
}

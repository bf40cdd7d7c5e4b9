use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::{FromRow, PgPool};
use tracing::debug;

use super::job::JobSummary;
use crate::database::manager::DatabaseError;
use crate::database::params::bind_values;
use crate::database::record::{RecordError, Validate};
use crate::sql::{sql_for_filtering, sql_for_partial_update, ColumnMap, FilterCriteria, FilterFields};

const COLUMNS: &str = "handle, name, description, num_employees, logo_url";

/// Request field names that differ from their column
const JS_TO_SQL: &ColumnMap = &[
    ("numEmployees", "num_employees"),
    ("logoUrl", "logo_url"),
    ("minEmployees", "num_employees"),
    ("maxEmployees", "num_employees"),
];

pub const FILTER_FIELDS: FilterFields = FilterFields {
    text: "name",
    lower: "minEmployees",
    upper: "maxEmployees",
};

/// Fields a PATCH body may carry; `handle` is the key and never changes
pub const UPDATABLE: &[&str] = &["name", "description", "numEmployees", "logoUrl"];
pub const NOT_NULL: &[&str] = &["name", "description"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

/// Company with the jobs it's hiring for
#[derive(Debug, Clone, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<JobSummary>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

/// Typed view of a PATCH body, used only to check value types
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanyUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

fn check_common(
    name: Option<&str>,
    num_employees: Option<i32>,
    logo_url: Option<&str>,
) -> Result<(), RecordError> {
    if name.is_some_and(str::is_empty) {
        return Err(RecordError::invalid("name", "must not be empty"));
    }
    if num_employees.is_some_and(|n| n < 0) {
        return Err(RecordError::invalid("numEmployees", "must be >= 0"));
    }
    if let Some(logo) = logo_url {
        url::Url::parse(logo).map_err(|_| RecordError::invalid("logoUrl", "must be a URI"))?;
    }
    Ok(())
}

impl Validate for NewCompany {
    fn validate(&self) -> Result<(), RecordError> {
        if self.handle.is_empty() || self.handle.len() > 25 {
            return Err(RecordError::invalid("handle", "must be 1 to 25 characters"));
        }
        if self.handle != self.handle.to_lowercase() {
            return Err(RecordError::invalid("handle", "must be lowercase"));
        }
        check_common(Some(&self.name), self.num_employees, self.logo_url.as_deref())
    }
}

impl Validate for CompanyUpdate {
    fn validate(&self) -> Result<(), RecordError> {
        check_common(self.name.as_deref(), self.num_employees, self.logo_url.as_deref())
    }
}

impl Company {
    /// Create a company. Fails with `Duplicate` if the handle is taken.
    pub async fn create(pool: &PgPool, data: NewCompany) -> Result<Company, DatabaseError> {
        let duplicate: Option<(String,)> = sqlx::query_as("SELECT handle FROM companies WHERE handle = $1")
            .bind(&data.handle)
            .fetch_optional(pool)
            .await?;
        if duplicate.is_some() {
            return Err(DatabaseError::Duplicate(format!("Duplicate company: {}", data.handle)));
        }

        let sql = format!(
            "INSERT INTO companies (handle, name, description, num_employees, logo_url)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let company = sqlx::query_as::<_, Company>(&sql)
            .bind(&data.handle)
            .bind(&data.name)
            .bind(&data.description)
            .bind(data.num_employees)
            .bind(&data.logo_url)
            .fetch_one(pool)
            .await?;
        Ok(company)
    }

    /// All companies, ordered by name
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Company>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM companies ORDER BY name");
        Ok(sqlx::query_as::<_, Company>(&sql).fetch_all(pool).await?)
    }

    /// Companies matching `criteria`, ordered by name
    pub async fn filter(pool: &PgPool, criteria: &FilterCriteria) -> Result<Vec<Company>, DatabaseError> {
        let (sql, values) = Self::filter_statement(criteria)?;
        debug!("Company filter: {}", sql);
        let rows = bind_values(sqlx::query_as::<_, Company>(&sql), &values).fetch_all(pool).await?;
        Ok(rows)
    }

    /// One company with its jobs
    pub async fn get(pool: &PgPool, handle: &str) -> Result<CompanyDetail, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM companies WHERE handle = $1");
        let company = sqlx::query_as::<_, Company>(&sql)
            .bind(handle)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| Self::not_found(handle))?;

        let jobs = sqlx::query_as::<_, JobSummary>(
            "SELECT id, title, salary, equity FROM jobs WHERE company_handle = $1 ORDER BY id",
        )
        .bind(handle)
        .fetch_all(pool)
        .await?;

        Ok(CompanyDetail { company, jobs })
    }

    /// Partial update: only the fields present in `data` change
    pub async fn update(pool: &PgPool, handle: &str, data: &Map<String, Value>) -> Result<Company, DatabaseError> {
        let (sql, values) = Self::update_statement(data)?;
        debug!("Company update: {}", sql);
        bind_values(sqlx::query_as::<_, Company>(&sql), &values)
            .bind(handle)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| Self::not_found(handle))
    }

    pub async fn remove(pool: &PgPool, handle: &str) -> Result<(), DatabaseError> {
        let deleted: Option<(String,)> = sqlx::query_as("DELETE FROM companies WHERE handle = $1 RETURNING handle")
            .bind(handle)
            .fetch_optional(pool)
            .await?;
        deleted.map(|_| ()).ok_or_else(|| Self::not_found(handle))
    }

    /// UPDATE statement; the handle binds after the SET values
    fn update_statement(data: &Map<String, Value>) -> Result<(String, Vec<Value>), DatabaseError> {
        let set = sql_for_partial_update(data, JS_TO_SQL)?;
        let sql = format!(
            "UPDATE companies SET {} WHERE handle = ${} RETURNING {COLUMNS}",
            set.clause,
            set.next_placeholder()
        );
        Ok((sql, set.values))
    }

    fn filter_statement(criteria: &FilterCriteria) -> Result<(String, Vec<Value>), DatabaseError> {
        let filter = sql_for_filtering(criteria, &FILTER_FIELDS, JS_TO_SQL)?;
        let sql = format!("SELECT {COLUMNS} FROM companies WHERE {} ORDER BY name", filter.clause);
        Ok((sql, filter.values))
    }

    fn not_found(handle: &str) -> DatabaseError {
        DatabaseError::NotFound(format!("No company: {}", handle))
    }
}

use axum::{
    extract::{rejection::{JsonRejection, PathRejection, QueryRejection}, Path, Query},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::models::job::{self, Job, JobUpdate, NewJob};
use crate::database::record::{field_map, parse_body};
use crate::database::DatabaseManager;
use crate::middleware::{ApiResponse, ApiResult};
use crate::sql::FilterCriteria;

use super::utils::{json_body, path_param, query_params};

/// Query string accepted by GET /jobs
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobSearch {
    pub title: Option<String>,
    pub min_salary: Option<i64>,
    pub max_salary: Option<i64>,
}

impl From<JobSearch> for FilterCriteria {
    fn from(q: JobSearch) -> Self {
        FilterCriteria {
            text: q.title,
            lower: q.min_salary,
            upper: q.max_salary,
        }
    }
}

/// POST /jobs { title, salary, equity, companyHandle } => { job }
///
/// Authorization required: admin
pub async fn create(body: Result<Json<Value>, JsonRejection>) -> ApiResult<Job> {
    let data: NewJob = parse_body(json_body(body)?)?;
    let pool = DatabaseManager::pool()?;
    let job = Job::create(&pool, data).await?;
    tracing::info!("Created job {} for '{}'", job.id, job.company_handle);
    Ok(ApiResponse::created("job", job))
}

/// GET /jobs => { jobs: [ { id, title, salary, equity, companyHandle }, ...] }
///
/// Filters by `title`, `minSalary` and `maxSalary` when any is given.
pub async fn list(query: Result<Query<JobSearch>, QueryRejection>) -> ApiResult<Vec<Job>> {
    let criteria = FilterCriteria::from(query_params(query)?);
    let pool = DatabaseManager::pool()?;
    let jobs = if criteria.is_empty() {
        Job::find_all(&pool).await?
    } else {
        Job::filter(&pool, &criteria).await?
    };
    Ok(ApiResponse::success("jobs", jobs))
}

/// GET /jobs/:id => { job }
pub async fn get(id: Result<Path<i32>, PathRejection>) -> ApiResult<Job> {
    let id = path_param(id)?;
    let pool = DatabaseManager::pool()?;
    let job = Job::get(&pool, id).await?;
    Ok(ApiResponse::success("job", job))
}

/// PATCH /jobs/:id { title?, salary?, equity? } => { job }
///
/// Authorization required: admin
pub async fn update(
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Job> {
    let id = path_param(id)?;
    let data = field_map::<JobUpdate>(json_body(body)?, job::UPDATABLE, job::NOT_NULL)?;
    let pool = DatabaseManager::pool()?;
    let job = Job::update(&pool, id, &data).await?;
    Ok(ApiResponse::success("job", job))
}

/// DELETE /jobs/:id => { deleted: id }
///
/// Authorization required: admin
pub async fn remove(id: Result<Path<i32>, PathRejection>) -> ApiResult<Value> {
    let id = path_param(id)?;
    let pool = DatabaseManager::pool()?;
    Job::remove(&pool, id).await?;
    tracing::info!("Deleted job {}", id);
    Ok(ApiResponse::success("deleted", json!(id)))
}

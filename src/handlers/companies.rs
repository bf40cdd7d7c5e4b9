use axum::{
    extract::{rejection::{JsonRejection, PathRejection, QueryRejection}, Path, Query},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::models::company::{self, Company, CompanyDetail, CompanyUpdate, NewCompany};
use crate::database::record::{field_map, parse_body};
use crate::database::DatabaseManager;
use crate::middleware::{ApiResponse, ApiResult};
use crate::sql::FilterCriteria;

use super::utils::{json_body, path_param, query_params};

/// Query string accepted by GET /companies
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanySearch {
    pub name: Option<String>,
    pub min_employees: Option<i64>,
    pub max_employees: Option<i64>,
}

impl From<CompanySearch> for FilterCriteria {
    fn from(q: CompanySearch) -> Self {
        FilterCriteria {
            text: q.name,
            lower: q.min_employees,
            upper: q.max_employees,
        }
    }
}

/// POST /companies { company } => { company }
///
/// Authorization required: admin
pub async fn create(body: Result<Json<Value>, JsonRejection>) -> ApiResult<Company> {
    let data: NewCompany = parse_body(json_body(body)?)?;
    let pool = DatabaseManager::pool()?;
    let company = Company::create(&pool, data).await?;
    tracing::info!("Created company '{}'", company.handle);
    Ok(ApiResponse::created("company", company))
}

/// GET /companies => { companies: [ { handle, name, description, numEmployees, logoUrl }, ...] }
///
/// Filters by `name` (case-insensitive substring), `minEmployees` and
/// `maxEmployees` when any is given.
pub async fn list(query: Result<Query<CompanySearch>, QueryRejection>) -> ApiResult<Vec<Company>> {
    let criteria = FilterCriteria::from(query_params(query)?);
    let pool = DatabaseManager::pool()?;
    let companies = if criteria.is_empty() {
        Company::find_all(&pool).await?
    } else {
        Company::filter(&pool, &criteria).await?
    };
    Ok(ApiResponse::success("companies", companies))
}

/// GET /companies/:handle => { company } with its jobs
pub async fn get(handle: Result<Path<String>, PathRejection>) -> ApiResult<CompanyDetail> {
    let handle = path_param(handle)?;
    let pool = DatabaseManager::pool()?;
    let company = Company::get(&pool, &handle).await?;
    Ok(ApiResponse::success("company", company))
}

/// PATCH /companies/:handle { name?, description?, numEmployees?, logoUrl? } => { company }
///
/// Authorization required: admin
pub async fn update(
    handle: Result<Path<String>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Company> {
    let handle = path_param(handle)?;
    let data = field_map::<CompanyUpdate>(json_body(body)?, company::UPDATABLE, company::NOT_NULL)?;
    let pool = DatabaseManager::pool()?;
    let company = Company::update(&pool, &handle, &data).await?;
    Ok(ApiResponse::success("company", company))
}

/// DELETE /companies/:handle => { deleted: handle }
///
/// Authorization required: admin
pub async fn remove(handle: Result<Path<String>, PathRejection>) -> ApiResult<Value> {
    let handle = path_param(handle)?;
    let pool = DatabaseManager::pool()?;
    Company::remove(&pool, &handle).await?;
    tracing::info!("Deleted company '{}'", handle);
    Ok(ApiResponse::success("deleted", json!(handle)))
}

use sqlx::{postgres::PgPoolOptions, Executor, PgPool};
use std::time::Duration;
use thiserror::Error;
use once_cell::sync::OnceCell;
use tracing::info;

use crate::config;
use crate::sql::ClauseError;

const SCHEMA: &str = include_str!("../../sql/schema.sql");

/// Errors from DatabaseManager and the models built on it
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Duplicate(String),

    #[error(transparent)]
    Clause(#[from] ClauseError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Connection-level failures (as opposed to a bad statement)
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            DatabaseError::InvalidDatabaseUrl
                | DatabaseError::Sqlx(sqlx::Error::Io(_))
                | DatabaseError::Sqlx(sqlx::Error::PoolTimedOut)
                | DatabaseError::Sqlx(sqlx::Error::PoolClosed)
                | DatabaseError::Sqlx(sqlx::Error::Tls(_))
        )
    }
}

/// Process-wide connection pool, created on first use from `config().database`
pub struct DatabaseManager {
    pool: OnceCell<PgPool>,
}

impl DatabaseManager {
    fn instance() -> &'static DatabaseManager {
        use std::sync::OnceLock;
        static INSTANCE: OnceLock<DatabaseManager> = OnceLock::new();
        INSTANCE.get_or_init(|| DatabaseManager { pool: OnceCell::new() })
    }

    /// Get the shared pool. Connections open on first use, so a bad or
    /// unreachable database surfaces from the query, not from here.
    pub fn pool() -> Result<PgPool, DatabaseError> {
        let pool = Self::instance().pool.get_or_try_init(|| {
            let settings = &config::config().database;
            let url = Self::connection_string(&settings.url)?;
            let pool = PgPoolOptions::new()
                .max_connections(settings.max_connections)
                .acquire_timeout(Duration::from_secs(settings.connection_timeout))
                .connect_lazy(&url)?;
            info!("Created database pool for: {}", Self::redacted(&url));
            Ok::<PgPool, DatabaseError>(pool)
        })?;
        Ok(pool.clone())
    }

    /// Validate the configured URL; bare `postgresql:///name` socket URLs are accepted as-is
    fn connection_string(raw: &str) -> Result<String, DatabaseError> {
        let url = url::Url::parse(raw).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        match url.scheme() {
            "postgres" | "postgresql" => Ok(url.into()),
            _ => Err(DatabaseError::InvalidDatabaseUrl),
        }
    }

    /// Connection string safe for logs (password masked)
    fn redacted(raw: &str) -> String {
        match url::Url::parse(raw) {
            Ok(mut url) => {
                if url.password().is_some() {
                    let _ = url.set_password(Some("***"));
                }
                url.into()
            }
            Err(_) => "<invalid url>".to_string(),
        }
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check() -> Result<(), DatabaseError> {
        let pool = Self::pool()?;
        sqlx::query("SELECT 1").execute(&pool).await?;
        Ok(())
    }

    /// Create the companies and jobs tables if they are missing
    pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
        pool.execute(SCHEMA).await?;
        info!("Schema is up to date");
        Ok(())
    }

    /// Close the pool (e.g., on shutdown)
    pub async fn close() {
        if let Some(pool) = Self::instance().pool.get() {
            pool.close().await;
            info!("Closed database pool");
        }
    }
}

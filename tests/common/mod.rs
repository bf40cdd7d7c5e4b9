#![allow(dead_code)]

use std::sync::Once;

use anyhow::{Context, Result};
use axum::{body::Body, http::Request, Router};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use jobly_api::auth::create_token;
use jobly_api::database::DatabaseManager;

static ENV: Once = Once::new();

/// Point the config singleton at the test environment before anything reads it
pub fn init_env() {
    ENV.call_once(|| {
        std::env::set_var("APP_ENV", "test");
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn app() -> Router {
    init_env();
    jobly_api::app()
}

pub fn u1_token() -> String {
    init_env();
    create_token("u1", false).expect("token")
}

pub fn admin_token() -> String {
    init_env();
    create_token("admin", true).expect("token")
}

/// Drive one request through the router without a socket
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Result<(u16, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json)?))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status().as_u16();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    Ok((status, json))
}

/// Serve the app on a free port for tests that talk HTTP
pub async fn spawn_server() -> Result<String> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    let router = app();
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });
    Ok(format!("http://127.0.0.1:{}", port))
}

/// Test database with fresh fixtures, or None when TEST_DATABASE_URL isn't set
pub async fn test_db() -> Result<Option<PgPool>> {
    init_env();
    if std::env::var("TEST_DATABASE_URL").is_err() {
        eprintln!("TEST_DATABASE_URL not set; skipping database test");
        return Ok(None);
    }

    let pool = DatabaseManager::pool()?;
    DatabaseManager::migrate(&pool).await?;
    sqlx::query("DELETE FROM jobs").execute(&pool).await?;
    sqlx::query("DELETE FROM companies").execute(&pool).await?;

    sqlx::query(
        "INSERT INTO companies (handle, name, num_employees, description, logo_url)
         VALUES ('c1', 'C1', 1, 'Desc1', 'http://c1.img'),
                ('c2', 'C2', 2, 'Desc2', 'http://c2.img'),
                ('c3', 'C3', 3, 'Desc3', 'http://c3.img')",
    )
    .execute(&pool)
    .await?;

    sqlx::query(
        "INSERT INTO jobs (title, salary, equity, company_handle)
         VALUES ('j1', 1, '0', 'c1'),
                ('j2', 2, '0.1', 'c1'),
                ('j3', 3, NULL, 'c2')",
    )
    .execute(&pool)
    .await?;

    Ok(Some(pool))
}

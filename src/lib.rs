pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod sql;

use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{authenticate_jwt, ensure_admin};

/// Full application router
pub fn app() -> Router {
    Router::new()
        // Public
        .route("/health", get(handlers::health::get))
        .merge(company_routes())
        .merge(job_routes())
        // Global middleware; the JWT layer only identifies, ensure_* layers enforce
        .layer(from_fn(authenticate_jwt))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

fn company_routes() -> Router {
    use handlers::companies;

    let public = Router::new()
        .route("/companies", get(companies::list))
        .route("/companies/:handle", get(companies::get));

    let admin = Router::new()
        .route("/companies", post(companies::create))
        .route(
            "/companies/:handle",
            axum::routing::patch(companies::update).delete(companies::remove),
        )
        .route_layer(from_fn(ensure_admin));

    public.merge(admin)
}

fn job_routes() -> Router {
    use handlers::jobs;

    let public = Router::new()
        .route("/jobs", get(jobs::list))
        .route("/jobs/:id", get(jobs::get));

    let admin = Router::new()
        .route("/jobs", post(jobs::create))
        .route("/jobs/:id", axum::routing::patch(jobs::update).delete(jobs::remove))
        .route_layer(from_fn(ensure_admin));

    public.merge(admin)
}

fn cors_layer() -> CorsLayer {
    let security = &config::config().security;
    if !security.enable_cors {
        return CorsLayer::new();
    }
    let origins: Vec<_> = security
        .cors_origins
        .iter()
        .filter_map(|o| o.parse::<axum::http::HeaderValue>().ok())
        .collect();
    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any)
    }
}

//! HTTP API Layer
//!
//! REST surface of the claims engine, built on Axum.
//!
//! # Architecture
//!
//! - **Handlers**: claim check, policy lookup and replacement, coverage evaluation
//! - **Middleware**: JWT authentication, tracing, audit logging
//! - **DTOs**: lenient claim payloads and policy documents
//! - **Error Handling**: consistent JSON error bodies
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::create_router;
//!
//! let app = create_router(coverage_service, config);
//! axum::serve(listener, app).await?;
//! ```

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use domain_policy::CoverageService;

use crate::config::ApiConfig;
use crate::handlers::{claims, coverage, health, policy};
use crate::middleware::{audit_middleware, auth_middleware};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub coverage: CoverageService,
    pub config: ApiConfig,
}

/// Creates the main API router
///
/// # Arguments
///
/// * `coverage` - Coverage service over the configured policy store
/// * `config` - API configuration
pub fn create_router(coverage: CoverageService, config: ApiConfig) -> Router {
    let state = AppState { coverage, config };

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let policy_routes = Router::new()
        .route("/", get(policy::list_policies))
        .route("/:number", get(policy::get_policy).put(policy::replace_policy));

    let claims_routes = Router::new().route("/check", post(claims::check_claim));

    let coverage_routes = Router::new()
        .route("/evaluate", post(coverage::evaluate))
        .route("/llm", post(coverage::evaluate_llm));

    // Protected API routes
    let api_routes = Router::new()
        .nest("/policies", policy_routes)
        .nest("/claims", claims_routes)
        .nest("/coverage", coverage_routes)
        .layer(axum_middleware::from_fn(audit_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

// src/routes.rs

use axum::{
    Router,
    http::Method,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{assessments, results},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (assessments, results).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (Database Pool + Config).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let assessment_routes = Router::new()
        .route("/", get(assessments::list_assessments))
        .route("/{id}", get(assessments::get_assessment))
        .route("/{id}/readiness", get(assessments::get_readiness))
        .route("/{id}/results", get(results::list_batches));

    let result_routes = Router::new()
        .route("/upload", post(results::upload_results))
        .route(
            "/{id}",
            get(results::get_batch).delete(results::delete_batch),
        )
        .route("/{id}/export", get(results::export_batch));

    Router::new()
        .nest("/api/assessments", assessment_routes)
        .nest("/api/results", result_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

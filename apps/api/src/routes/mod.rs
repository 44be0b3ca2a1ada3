pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::catalog::handlers as catalog;
use crate::matching::handlers as matching;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/version", get(health::version_handler))
        // Catalog
        .route("/api/v1/skills", get(catalog::handle_list_skills))
        .route("/api/v1/skills/:id", get(catalog::handle_get_skill))
        .route("/api/v1/candidates", get(catalog::handle_list_candidates))
        .route("/api/v1/candidates/:id", get(catalog::handle_get_candidate))
        .route(
            "/api/v1/candidates/:id/matching-jobs",
            get(matching::handle_matching_jobs),
        )
        .route("/api/v1/jobs", get(catalog::handle_list_jobs))
        .route("/api/v1/jobs/:id", get(catalog::handle_get_job))
        .route(
            "/api/v1/jobs/:id/matching-candidates",
            get(matching::handle_matching_candidates),
        )
        // Matching
        .route(
            "/api/v1/matches/calculate",
            post(matching::handle_calculate_match),
        )
        .route(
            "/api/v1/matches/batch-calculate",
            post(matching::handle_batch_calculate),
        )
        .route("/api/v1/matches/:id", get(matching::handle_get_match))
        .with_state(state)
}

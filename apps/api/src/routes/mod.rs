pub mod health;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::bias::handlers as bias_handlers;
use crate::catalog::handlers as catalog_handlers;
use crate::fairness::handlers as fairness_handlers;
use crate::matching::handlers as match_handlers;
use crate::registry::handlers as registry_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Matching engine
        .route(
            "/api/v1/matches/compute",
            post(match_handlers::handle_compute_match),
        )
        .route(
            "/api/v1/matches/rank",
            post(match_handlers::handle_rank_candidates),
        )
        .route(
            "/api/v1/matches/:id/verify",
            patch(match_handlers::handle_verify_match),
        )
        .route(
            "/api/v1/jobs/:job_id/matches",
            get(match_handlers::handle_get_matches_for_job),
        )
        // Skill associations
        .route(
            "/api/v1/candidates/:id/skills",
            put(catalog_handlers::handle_set_candidate_skills),
        )
        .route(
            "/api/v1/jobs/:id/skills",
            put(catalog_handlers::handle_set_job_skills),
        )
        // Bias audits
        .route(
            "/api/v1/audits/candidate",
            post(bias_handlers::handle_audit_candidate),
        )
        .route("/api/v1/audits/job", post(bias_handlers::handle_audit_job))
        .route(
            "/api/v1/candidates/:id/audits",
            get(bias_handlers::handle_candidate_audit_history),
        )
        .route(
            "/api/v1/jobs/:id/audits",
            get(bias_handlers::handle_job_audit_history),
        )
        // Prompt template registry
        .route(
            "/api/v1/prompt-templates",
            post(registry_handlers::handle_create_template),
        )
        .route(
            "/api/v1/prompt-templates/:name/activate",
            post(registry_handlers::handle_activate_template),
        )
        .route(
            "/api/v1/prompt-templates/:name/active",
            get(registry_handlers::handle_get_active_template),
        )
        .route(
            "/api/v1/prompt-templates/:name/history",
            get(registry_handlers::handle_template_history),
        )
        // Fairness metrics
        .route(
            "/api/v1/fairness/snapshot",
            post(fairness_handlers::handle_snapshot),
        )
        .route(
            "/api/v1/fairness/latest",
            get(fairness_handlers::handle_latest),
        )
        .with_state(state)
}

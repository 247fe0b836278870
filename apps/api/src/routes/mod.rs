pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis_handlers;
use crate::resumes::handlers as resume_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/upload_resume", post(resume_handlers::handle_upload_resume))
        .route(
            "/analyze_skills",
            post(analysis_handlers::handle_analyze_skills),
        )
        .route(
            "/skill_gap_analysis",
            post(analysis_handlers::handle_skill_gap_analysis),
        )
        .route(
            "/weekly_learning_task_generator",
            post(analysis_handlers::handle_weekly_tasks),
        )
        .with_state(state)
}

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;

use crate::server::endpoints::{programs, status, students};
use crate::types::AppState;

mod endpoints;
mod types;

pub use types::{ApiError, ApiErrorType};

/// Creates a router that can be used by `axum`.
///
/// # Parameters
/// - `app_state`: The app server state.
///
/// # Returns
/// The router.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let program_router = Router::new()
        .route("/programs", get(programs::get_programs))
        .route(
            "/programs/:program_id/requirements",
            get(programs::get_public_requirements),
        )
        .route(
            "/programs/:program_id/match/:student_id",
            get(programs::get_program_match),
        )
        .route("/match", post(programs::post_match));

    let student_router = Router::new().route("/students/:student_id", put(students::put_student));

    Router::new()
        .route("/health", get(status::get_health))
        .merge(program_router)
        .merge(student_router)
        .with_state(app_state)
}

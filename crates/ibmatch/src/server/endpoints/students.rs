use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::matching::{validate_student, StudentProfile};
use crate::server::types::ApiErrorType;
use crate::types::AppState;

/// PUT /students/:student_id
///
/// Stores a student's profile and diploma courses, replacing any previous version.
/// The id in the path wins over the one in the body.
#[cfg_attr(test, axum_macros::debug_handler)]
pub async fn put_student(
    Path(student_id): Path<String>,
    State(s): State<Arc<AppState>>,
    payload: Result<Json<StudentProfile>, JsonRejection>,
) -> Response {
    let Json(mut student) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!(
                "PUT /students/{} - rejected body: {}",
                student_id,
                rejection.body_text()
            );
            return ApiErrorType::from(rejection).into_response();
        }
    };

    info!(
        "PUT /students/{} ({} courses)",
        student_id,
        student.courses.len()
    );
    student.id = student_id;

    let stored = validate_student(&student).and_then(|_| s.db.upsert_student(&student));
    match stored {
        Ok(()) => (StatusCode::OK, Json(student)).into_response(),
        Err(e) => {
            error!("Failed to store student {}: {}", student.id, e);
            ApiErrorType::from(e).into_response()
        }
    }
}

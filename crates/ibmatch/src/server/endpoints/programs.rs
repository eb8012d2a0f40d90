//! API endpoints for programs and requirement matching.
//!
//! Anonymous callers get the public requirement view; a student id unlocks the
//! evaluated match. Evaluations are computed per request and never stored.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::matching::{validate_program, validate_student, MatchError, Program, StudentProfile};
use crate::server::types::ApiErrorType;
use crate::types::AppState;

/// Body of `POST /match`.
#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub program: Program,
    pub student: StudentProfile,
}

/// Loads a program or reports it missing.
fn load_program(state: &AppState, program_id: &str) -> Result<Program, MatchError> {
    state
        .db
        .get_program(program_id)?
        .ok_or_else(|| MatchError::ProgramNotFound {
            program_id: program_id.to_string(),
        })
}

fn error_response(err: MatchError) -> Response {
    if err.is_not_found() {
        warn!("{}", err);
    } else {
        error!("Request failed: {}", err);
    }
    ApiErrorType::from(err).into_response()
}

/// GET /programs
///
/// Returns a summary of every stored program.
#[cfg_attr(test, axum_macros::debug_handler)]
pub async fn get_programs(State(s): State<Arc<AppState>>) -> Response {
    info!("GET /programs");

    match s.db.list_programs() {
        Ok(programs) => (StatusCode::OK, Json(programs)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /programs/:program_id/requirements
///
/// Public view: every slot listed as what is required, with no verdict.
#[cfg_attr(test, axum_macros::debug_handler)]
pub async fn get_public_requirements(
    Path(program_id): Path<String>,
    State(s): State<Arc<AppState>>,
) -> Response {
    info!("GET /programs/{}/requirements", program_id);

    match load_program(&s, &program_id) {
        Ok(program) => {
            let views = s.processor.public_requirements(&program);
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// GET /programs/:program_id/match/:student_id
///
/// Evaluates a stored student against a stored program.
#[cfg_attr(test, axum_macros::debug_handler)]
pub async fn get_program_match(
    Path((program_id, student_id)): Path<(String, String)>,
    State(s): State<Arc<AppState>>,
) -> Response {
    info!("GET /programs/{}/match/{}", program_id, student_id);

    let program = match load_program(&s, &program_id) {
        Ok(program) => program,
        Err(e) => return error_response(e),
    };

    let student = match s.db.get_student(&student_id) {
        Ok(Some(student)) => student,
        Ok(None) => return error_response(MatchError::StudentNotFound { student_id }),
        Err(e) => return error_response(e),
    };

    let result = s.processor.compute_program_match(&program, &student);
    (StatusCode::OK, Json(result)).into_response()
}

/// POST /match
///
/// Evaluates an inline program and student without touching the store.
#[cfg_attr(test, axum_macros::debug_handler)]
pub async fn post_match(
    State(s): State<Arc<AppState>>,
    payload: Result<Json<MatchRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!("POST /match - rejected body: {}", rejection.body_text());
            return ApiErrorType::from(rejection).into_response();
        }
    };

    info!(
        "POST /match - program {} vs student {}",
        request.program.id, request.student.id
    );

    let valid = validate_program(&request.program)
        .and_then(|_| validate_student(&request.student));
    if let Err(e) = valid {
        return error_response(e);
    }

    let result = s
        .processor
        .compute_program_match(&request.program, &request.student);
    (StatusCode::OK, Json(result)).into_response()
}

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::matching::MatchError;

/// JSON error body returned by every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// An error response: status code plus body.
#[derive(Debug)]
pub struct ApiErrorType {
    pub status: StatusCode,
    pub body: ApiError,
}

impl From<(StatusCode, &str, Option<String>)> for ApiErrorType {
    fn from((status, error, context): (StatusCode, &str, Option<String>)) -> Self {
        Self {
            status,
            body: ApiError {
                error: error.to_string(),
                context,
            },
        }
    }
}

impl From<MatchError> for ApiErrorType {
    fn from(err: MatchError) -> Self {
        let (status, message) = if err.is_not_found() {
            (StatusCode::NOT_FOUND, "Not found")
        } else if err.is_client_error() {
            (StatusCode::BAD_REQUEST, "Invalid input")
        } else {
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        };

        ApiErrorType::from((status, message, Some(err.to_string())))
    }
}

/// Bodies that fail to deserialize are the caller's fault, so they get a 400.
impl From<JsonRejection> for ApiErrorType {
    fn from(rejection: JsonRejection) -> Self {
        ApiErrorType::from((
            StatusCode::BAD_REQUEST,
            "Invalid input",
            Some(rejection.body_text()),
        ))
    }
}

impl IntoResponse for ApiErrorType {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

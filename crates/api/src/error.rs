//! HTTP error mapping for the API.
//!
//! Every failure leaves the server as `{"error": <message>, "code": <CODE>}`.
//! Auth failures carry only their fixed generic message. Storage and signing
//! faults are logged here and reach the client as a bare 500.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use edunexus_core::error::CoreError;
use serde::Serialize;

/// Error type returned by handlers, middleware and the auth service.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Unexpected fault. The message is logged, never sent.
    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

/// Body extraction failures become a JSON 400 instead of axum's plain-text 422.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Rejected request body");
        let message = match rejection {
            JsonRejection::JsonDataError(_) => "Request body is missing required fields",
            JsonRejection::JsonSyntaxError(_) => "Request body is not valid JSON",
            JsonRejection::MissingJsonContentType(_) => "Expected a JSON request body",
            _ => "Invalid request body",
        };
        AppError::BadRequest(message.to_string())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

/// What the client is told about a failure.
struct Rejection {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl Rejection {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "Internal server error",
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let rejection = match &self {
            AppError::Core(err) => reject_core(err),
            AppError::Database(err) => reject_sqlx(err),
            AppError::BadRequest(msg) => Rejection::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                Rejection::internal()
            }
        };

        let body = ErrorBody {
            error: rejection.message,
            code: rejection.code,
        };
        (rejection.status, Json(body)).into_response()
    }
}

fn reject_core(err: &CoreError) -> Rejection {
    match err {
        CoreError::NotFound { entity, id } => Rejection::new(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => {
            Rejection::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg)
        }
        CoreError::Conflict(msg) => Rejection::new(StatusCode::CONFLICT, "CONFLICT", msg),
        // The variant is the internal reason; the display text is all the client sees.
        CoreError::Unauthorized(failure) => {
            tracing::debug!(reason = ?failure, "Request unauthorized");
            Rejection::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", failure.to_string())
        }
        CoreError::Forbidden(msg) => Rejection::new(StatusCode::FORBIDDEN, "FORBIDDEN", msg),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            Rejection::internal()
        }
    }
}

/// Unique violations become 409; every other database failure is a 500.
fn reject_sqlx(err: &sqlx::Error) -> Rejection {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            tracing::warn!(constraint, "Unique constraint violated");
            Rejection::new(
                StatusCode::CONFLICT,
                "CONFLICT",
                format!("Duplicate value violates unique constraint: {constraint}"),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            Rejection::internal()
        }
    }
}

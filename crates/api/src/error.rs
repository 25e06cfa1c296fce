use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{json, Map, Value};
use songbook_core::error::CoreError;
use songbook_db::store::StoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`StoreError`] for persistence
/// outcomes, and adds HTTP-specific variants. Implements [`IntoResponse`] to
/// produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `songbook_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An outcome of the versioned entity store.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A database error from sqlx outside the store.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// No resource lives at the requested path.
    #[error("Resource not found")]
    NotFound,

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => not_found(entity, *id),
                CoreError::EditConflict { entity, id } => edit_conflict(entity, *id),
                CoreError::InvalidFields(_) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "VALIDATION_ERROR",
                    "One or more fields failed validation".to_string(),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- Store outcomes ---
            AppError::Store(store) => match store {
                StoreError::NotFound { entity, id } => not_found(entity, *id),
                StoreError::EditConflict { entity, id } => edit_conflict(entity, *id),
                StoreError::Timeout(after) => {
                    tracing::error!(timeout = ?after, "Store operation timed out");
                    internal()
                }
                StoreError::Database(err) => classify_sqlx_error(err),
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "The requested resource could not be found".to_string(),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });

        // Field-level failures are listed as `{ "field": "message" }`.
        if let AppError::Core(CoreError::InvalidFields(errors)) = &self {
            let fields: Map<String, Value> = errors
                .iter()
                .map(|e| (e.field.clone(), Value::String(e.message.clone())))
                .collect();
            body["fields"] = Value::Object(fields);
        }

        (status, axum::Json(body)).into_response()
    }
}

fn not_found(entity: &str, id: i64) -> (StatusCode, &'static str, String) {
    (
        StatusCode::NOT_FOUND,
        "NOT_FOUND",
        format!("{entity} with id {id} not found"),
    )
}

fn edit_conflict(entity: &str, id: i64) -> (StatusCode, &'static str, String) {
    (
        StatusCode::CONFLICT,
        "EDIT_CONFLICT",
        format!("Unable to update {entity} {id} due to an edit conflict, please try again"),
    )
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}

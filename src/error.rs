//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.
//!
//! Rendering depends on the deployment [`Environment`]. `IntoResponse`
//! always produces the production-safe form and stashes the original error
//! in the response extensions; the `render_errors` middleware re-renders it
//! with full detail outside production.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use validator::ValidationErrors;

use crate::{config::Environment, services::mailer::MailError, services::store::StoreError};

/// Application-wide error type.
///
/// # Error Categories
///
/// - **Validation Errors**: malformed or missing fields (422)
/// - **Resource Errors**: unknown route or record (404)
/// - **Authentication Errors**: missing or invalid access token (401)
/// - **Conflict**: unique field already taken (409)
/// - **Unclassified**: database, mail and internal failures (500)
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Field-level validation failure.
    #[error("Validation failed")]
    Validation(#[from] ValidationErrors),

    /// Requested route or record does not exist, or isn't owned by the caller.
    #[error("{0}")]
    NotFound(&'static str),

    /// Access token is missing, unknown or inactive.
    #[error("Invalid access token")]
    InvalidAccessToken,

    #[error("{0}")]
    Conflict(String),

    /// Request body could not be read at all (e.g. over the size limit).
    /// Keeps the status the extractor rejected with.
    #[error("Invalid request: {1}")]
    InvalidRequest(StatusCode, String),

    #[error("Failed to send invitation")]
    Mail(#[from] MailError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Duplicate(field) => {
                AppError::Conflict(format!("{field} is already registered"))
            }
            StoreError::Database(e) => AppError::Database(e),
            StoreError::Corrupt(detail) => AppError::Internal(anyhow::anyhow!(detail)),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidAccessToken => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InvalidRequest(status, _) => *status,
            AppError::Mail(_) | AppError::Database(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Render an error for the given environment.
///
/// # Response Format
///
/// Validation failures, in every environment:
/// ```json
/// {
///   "code": "ValidationError",
///   "errors": {
///     "name": { "kind": "required", "message": "Path `name` is required.", "path": "name" }
///   }
/// }
/// ```
///
/// Everything else:
/// ```json
/// { "message": "Not Found", "error": {} }
/// ```
/// Outside production `error` carries `status` and the debug `detail`. In
/// production 5xx messages are replaced with a generic one.
pub fn render(error: &AppError, environment: Environment) -> Response {
    if let AppError::Validation(errors) = error {
        let body = json!({
            "code": "ValidationError",
            "errors": field_errors(errors),
        });
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response();
    }

    let status = error.status();
    let expose = environment.exposes_error_detail();

    let message = if status.is_server_error() && !expose {
        "Internal Server Error".to_string()
    } else {
        error.to_string()
    };

    let detail = if expose {
        json!({
            "status": status.as_u16(),
            "detail": format!("{error:?}"),
        })
    } else {
        json!({})
    };

    (status, Json(json!({ "message": message, "error": detail }))).into_response()
}

/// Flatten validator output into `{ field: { kind, message, path } }`,
/// keeping the first failure per field.
fn field_errors(errors: &ValidationErrors) -> BTreeMap<String, Value> {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, failures)| {
            let field = field.to_string();
            let failure = failures.first()?;
            let message = failure
                .message
                .as_ref()
                .map(|message| message.to_string())
                .unwrap_or_else(|| format!("Path `{field}` is invalid."));

            Some((
                field.clone(),
                json!({
                    "kind": failure.code.to_string(),
                    "message": message,
                    "path": field,
                }),
            ))
        })
        .collect()
}

/// Convert AppError into an HTTP response.
///
/// This implementation allows Axum handlers to return `Result<T, AppError>`.
/// The response body is the production rendering; the error itself rides
/// along in the extensions for `render_errors`.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status().is_server_error() {
            tracing::error!(error = ?self, "Request failed");
        }

        let mut response = render(&self, Environment::Production);
        response.extensions_mut().insert(Arc::new(self));
        response
    }
}

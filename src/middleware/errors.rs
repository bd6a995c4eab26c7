//! Error normalization at the end of the handler chain.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{
    config::Environment,
    error::{AppError, render},
};

/// Re-render failed responses for the configured environment.
///
/// Responses built from an [`AppError`] already carry the production
/// rendering. Outside production they are replaced with the detailed form;
/// other responses pass through untouched.
pub async fn render_errors(
    State(environment): State<Environment>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let error = response.extensions_mut().remove::<Arc<AppError>>();

    match error {
        Some(error) if environment.exposes_error_detail() => render(&error, environment),
        _ => response,
    }
}

/// Fallback for unmatched routes.
pub async fn not_found() -> AppError {
    AppError::NotFound("Not Found")
}

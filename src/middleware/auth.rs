//! Access token authentication middleware.
//!
//! Two guards share one resolution routine:
//! - [`access_token_guard`] reads the `x-access-token` header
//!   (`/accountant/customers` routes)
//! - [`bearer_guard`] reads `Authorization: Bearer <token>` (`/customers` routes)
//!
//! Each one:
//! 1. Extracts the token from its header
//! 2. Hashes it and looks up an active token in the store
//! 3. Injects the accountant's identity into the request
//! 4. Rejects unauthorized requests with HTTP 401

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{AppState, error::AppError, services::tokens::hash_token};

/// Header carrying the accountant's access token.
pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";

/// Authentication context attached to authenticated requests.
///
/// Handlers take it as `Extension<AuthContext>` and scope every query by
/// `accountant_id`.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub accountant_id: Uuid,
    pub email: String,
}

/// Guard for routes authenticated with the `x-access-token` header.
pub async fn access_token_guard(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = access_token(request.headers()).ok_or(AppError::InvalidAccessToken)?;
    let context = resolve(&state, &token).await?;

    Ok(proceed(context, request, next).await)
}

/// Guard for routes authenticated with `Authorization: Bearer <token>`.
pub async fn bearer_guard(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).ok_or(AppError::InvalidAccessToken)?;
    let context = resolve(&state, &token).await?;

    Ok(proceed(context, request, next).await)
}

fn access_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(ACCESS_TOKEN_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Look up the hashed token and build the caller's identity.
async fn resolve(state: &AppState, token: &str) -> Result<AuthContext, AppError> {
    let accountant = state
        .accountants
        .find_by_token(&hash_token(token))
        .await?
        .ok_or(AppError::InvalidAccessToken)?;

    Ok(AuthContext {
        accountant_id: accountant.id,
        email: accountant.email,
    })
}

async fn proceed(context: AuthContext, mut request: Request, next: Next) -> Response {
    tracing::debug!(accountant_id = %context.accountant_id, "Request authenticated");

    request.extensions_mut().insert(context);
    next.run(request).await
}

//! Accountant registration handler.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::{
    AppState,
    error::AppError,
    extract::Payload,
    models::accountant::{NewAccountant, RegisterAccountantRequest, TokenResponse},
    services::{password::hash_password, tokens},
};

/// Create an accountant.
///
/// # Endpoint
///
/// `POST /accountants`
///
/// # Request Body
///
/// ```json
/// {
///   "email": "accountant@example.com",
///   "password": "some-password"
/// }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: `{ "token": "..." }`, the only time the
///   plain token is shown
/// - **Error (422)**: Invalid email or short password
/// - **Error (409)**: Email already registered
pub async fn register_accountant(
    State(state): State<AppState>,
    Payload(request): Payload<RegisterAccountantRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    request.validate()?;

    let email = request.email.trim().to_lowercase();
    let password = request.password;

    // CPU-bound, run on the blocking pool
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(anyhow::Error::from)??;

    let token = tokens::generate_token();

    let accountant = state
        .accountants
        .register(NewAccountant {
            email,
            password_hash,
            token_hash: tokens::hash_token(&token),
        })
        .await?;

    tracing::info!(accountant_id = %accountant.id, "Accountant registered");

    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

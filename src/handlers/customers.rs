//! Customer management HTTP handlers.
//!
//! This module implements the customer endpoints, always scoped to the
//! authenticated accountant:
//! - POST /accountant/customers - Create a customer
//! - GET /accountant/customers - List the accountant's customers
//! - GET /accountant/customers/{id} - Get customer data
//! - PUT /accountant/customers/{id} - Replace customer data
//! - PUT /accountant/customers/{id}/invitation - Send an invitation e-mail
//! - DELETE /accountant/customers/{id} - Delete a customer
//!
//! `POST /customers` and `GET /customers/{id}` reuse `create_customer` and
//! `get_customer` behind the bearer guard.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    AppState,
    error::AppError,
    extract::Payload,
    middleware::auth::AuthContext,
    models::customer::{Customer, CustomerDraft, CustomerPayload, CustomerResponse},
};

/// Ids are UUIDs; anything else cannot name a stored customer.
fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}

/// Create a customer.
///
/// # Endpoint
///
/// `POST /accountant/customers`
///
/// # Request Body
///
/// ```json
/// {
///   "name": "Jan Kowalski",
///   "company_name": "PolKrak",
///   "email": "kowalski@gmail.com",
///   "phone": "+48 333 222 111",
///   "tax_id": "PL123432134",
///   "settlement_period": "quarterly",
///   "vat_payer": true,
///   "social_security_payer": true,
///   "has_employees": false
/// }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: The created customer, with `_id` and `created_at`
/// - **Error (422)**: Validation failed, errors keyed by field
/// - **Error (401)**: Invalid access token
pub async fn create_customer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Payload(payload): Payload<CustomerPayload>,
) -> Result<Json<CustomerResponse>, AppError> {
    let draft = CustomerDraft::try_from(payload)?;

    // Link to authenticated accountant
    let customer = state
        .customers
        .insert(Customer::new(auth.accountant_id, draft))
        .await?;

    tracing::info!(
        accountant_id = %auth.accountant_id,
        customer_id = %customer.id,
        "Customer created"
    );

    Ok(Json(customer.into()))
}

/// List the accountant's customers, newest first.
pub async fn list_customers(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<CustomerResponse>>, AppError> {
    let customers = state.customers.list(auth.accountant_id).await?;

    Ok(Json(customers.into_iter().map(Into::into).collect()))
}

/// Get a customer by ID.
///
/// Returns 404 if the customer doesn't exist OR belongs to a different
/// accountant.
pub async fn get_customer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<Json<CustomerResponse>, AppError> {
    let id = parse_id(&id).ok_or(AppError::NotFound("Customer not found"))?;

    let customer = state
        .customers
        .find(auth.accountant_id, id)
        .await?
        .ok_or(AppError::NotFound("Customer not found"))?;

    Ok(Json(customer.into()))
}

/// Replace a customer.
///
/// # Response
///
/// - **Success (204 No Content)**
/// - **Error (422)**: The body is incomplete or invalid; nothing is written
/// - **Error (404)**: No customer with this id is owned by the caller
pub async fn update_customer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    Payload(payload): Payload<CustomerPayload>,
) -> Result<StatusCode, AppError> {
    let draft = CustomerDraft::try_from(payload)?;
    let id = parse_id(&id).ok_or(AppError::NotFound("Customer not found"))?;

    if !state.customers.replace(auth.accountant_id, id, draft).await? {
        return Err(AppError::NotFound("Customer not found"));
    }

    tracing::info!(
        accountant_id = %auth.accountant_id,
        customer_id = %id,
        "Customer updated"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Send an invitation e-mail to a customer on the accountant's behalf.
///
/// # Process
///
/// 1. Load the requesting accountant
/// 2. Load the customer, scoped to that accountant
/// 3. Dispatch the invitation
///
/// Any failing step aborts the request with its error.
pub async fn invite_customer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let accountant = state
        .accountants
        .find(auth.accountant_id)
        .await?
        .ok_or(AppError::NotFound("Accountant not found"))?;

    let id = parse_id(&id).ok_or(AppError::NotFound("Customer not found"))?;
    let customer = state
        .customers
        .find(accountant.id, id)
        .await?
        .ok_or(AppError::NotFound("Customer not found"))?;

    state.mailer.send_invitation(&accountant, &customer).await?;

    tracing::info!(
        accountant_id = %accountant.id,
        customer_id = %customer.id,
        "Invitation dispatched"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Delete a customer.
///
/// Always 204, also when the customer doesn't exist or isn't the caller's.
pub async fn delete_customer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if let Some(id) = parse_id(&id) {
        let removed = state.customers.delete(auth.accountant_id, id).await?;
        tracing::info!(
            accountant_id = %auth.accountant_id,
            customer_id = %id,
            removed,
            "Customer deleted"
        );
    }

    Ok(StatusCode::NO_CONTENT)
}

//! Accountant model and registration request/response types.
//!
//! Accountants are the tenants of the service. Each one owns a set of
//! customers, referenced by `customers.accountant_id`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Represents an accountant record from the database.
///
/// # Database Table
///
/// Maps to the `accountants` table with columns:
/// - `id`: Unique identifier (UUID)
/// - `email`: Login and sender address, unique
/// - `password_hash`: Argon2 PHC string
/// - `created_at`: When the accountant registered
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Accountant {
    pub id: Uuid,

    pub email: String,

    /// Argon2 hash of the password. Never returned to clients.
    pub password_hash: String,

    pub created_at: DateTime<Utc>,
}

/// A fully prepared registration, with secrets already hashed.
#[derive(Debug, Clone)]
pub struct NewAccountant {
    pub email: String,
    pub password_hash: String,

    /// SHA-256 hex digest of the access token handed back to the client.
    pub token_hash: String,
}

/// Request body for `POST /accountants`.
///
/// # JSON Example
///
/// ```json
/// {
///   "email": "accountant@example.com",
///   "password": "some-password"
/// }
/// ```
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterAccountantRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Response body for `POST /accountants`.
///
/// The token is only shown here; the server keeps just its hash.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

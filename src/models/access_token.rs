//! Access token model for authentication.
//!
//! Tokens are handed to accountants at registration and sent back on every
//! request. They are stored in the database as SHA-256 hashes.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Represents an access token record from the database.
///
/// # Database Table
///
/// Maps to the `access_tokens` table with columns:
/// - `id`: Unique identifier (UUID)
/// - `accountant_id`: Owner of the token
/// - `token_hash`: SHA-256 hash of the actual token
/// - `created_at`: When the token was issued
/// - `is_active`: Whether the token is currently valid
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AccessToken {
    pub id: Uuid,

    pub accountant_id: Uuid,

    /// SHA-256 hash of the actual token (64 hex characters)
    ///
    /// When a request comes in with `x-access-token: abc123`, we:
    /// 1. Hash "abc123" with SHA-256
    /// 2. Look up this hash in the database
    /// 3. If found and active, authenticate the request
    pub token_hash: String,

    pub created_at: DateTime<Utc>,

    /// Inactive tokens are rejected during authentication. This revokes
    /// access without deleting the record.
    pub is_active: bool,
}

//! Access token generation and hashing.

use sha2::{Digest, Sha256};

/// Generate cryptographically secure random token.
///
/// # Output
///
/// 64 hex characters (32 random bytes)
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::random();
    hex::encode(bytes)
}

/// SHA-256 hex digest of a token. Only this digest is ever stored.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());

    hex::encode(hasher.finalize())
}

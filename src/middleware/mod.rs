//! HTTP middleware components.
//!
//! Middleware are functions that run before (or around) route handlers.
//! They can:
//! - Authenticate requests
//! - Short-circuit requests (reject unauthorized)
//! - Rewrite error responses

/// Access token authentication middleware
pub mod auth;
/// Error normalization middleware and route fallback
pub mod errors;

//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, auth context)
//! 2. Calls the entity stores and, for invitations, the mailer
//! 3. Returns HTTP response (JSON, status code) or an `AppError`

/// Accountant registration
pub mod accountants;
/// Customer management endpoints
pub mod customers;
/// Health check
pub mod health;

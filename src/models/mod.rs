//! Data models representing stored entities and their API shapes.

/// Access token authentication model
pub mod access_token;
/// Accountant (tenant) model
pub mod accountant;
/// Customer model
pub mod customer;

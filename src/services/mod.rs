//! Business services: entity stores, mail dispatch and credential helpers.

pub mod mailer;
pub mod memory;
pub mod password;
pub mod postgres;
pub mod store;
pub mod tokens;

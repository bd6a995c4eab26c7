//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (optional): PostgreSQL connection string. Without it the
///   service keeps its data in memory.
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `APP_ENV` (optional): `production` hides error details, anything else shows them
/// - `PORTAL_URL` (optional): base URL of the customer portal used in invitation links
/// - `SMTP_*`: see [`SmtpConfig`]
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: Option<String>,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_app_env")]
    pub app_env: String,

    #[serde(default = "default_portal_url")]
    pub portal_url: String,

    /// Loaded separately from the `SMTP_` prefixed variables.
    #[serde(skip)]
    pub smtp: SmtpConfig,
}

/// Outgoing mail settings, read from `SMTP_`-prefixed variables.
///
/// With `SMTP_ENABLED` unset or false, invitations are only logged.
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_smtp_host")]
    pub host: String,

    #[serde(default = "default_smtp_port")]
    pub port: u16,

    #[serde(default)]
    pub user: String,

    #[serde(default)]
    pub password: String,

    #[serde(default = "default_smtp_from")]
    pub from: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            host: default_smtp_host(),
            port: default_smtp_port(),
            user: String::new(),
            password: String::new(),
            from: default_smtp_from(),
        }
    }
}

/// Deployment environment, deciding how much of an error reaches the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Production,
    Development,
}

impl Environment {
    /// Only the exact name `production` (any case) is treated as production.
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    pub fn exposes_error_detail(self) -> bool {
        self != Environment::Production
    }
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    3000
}

fn default_app_env() -> String {
    "development".to_string()
}

fn default_portal_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_smtp_from() -> String {
    "no-reply@localhost".to_string()
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if environment variable values cannot be parsed into expected types.
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        let mut config = envy::from_env::<Config>()?;
        config.smtp = envy::prefixed("SMTP_").from_env::<SmtpConfig>()?;

        Ok(config)
    }

    pub fn environment(&self) -> Environment {
        Environment::from_name(&self.app_env)
    }
}

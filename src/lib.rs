//! Bookkeeping Service
//!
//! A REST API for accountants to manage the customers (companies) they keep
//! the books for, and to invite those customers to the customer portal.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Storage**: PostgreSQL with sqlx, or in memory when no database is configured
//! - **Authentication**: opaque access tokens with SHA-256 hashing
//! - **Mail**: SMTP via lettre, or log-only
//! - **Format**: JSON requests/responses

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::{
    config::{Config, Environment},
    services::{
        mailer::{LogMailer, Mailer, SmtpMailer},
        memory::MemoryStore,
        postgres::PgStore,
        store::{AccountantStore, CustomerStore},
    },
};

/// Shared handles available to every handler via `State`.
#[derive(Clone)]
pub struct AppState {
    pub customers: Arc<dyn CustomerStore>,
    pub accountants: Arc<dyn AccountantStore>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    /// Connect the stores and mailer described by the configuration.
    ///
    /// With a `DATABASE_URL` the PostgreSQL pool is created and migrated;
    /// without one, data is kept in memory.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let (customers, accountants) = match &config.database_url {
            Some(url) => {
                let pool = db::create_pool(url).await?;
                tracing::info!("Database pool created");

                db::run_migrations(&pool).await?;
                tracing::info!("Database migrations complete");

                let store = Arc::new(PgStore::new(pool));
                (
                    store.clone() as Arc<dyn CustomerStore>,
                    store as Arc<dyn AccountantStore>,
                )
            }
            None => {
                tracing::warn!("DATABASE_URL not set, keeping data in memory");
                let store = Arc::new(MemoryStore::new());
                (
                    store.clone() as Arc<dyn CustomerStore>,
                    store as Arc<dyn AccountantStore>,
                )
            }
        };

        let mailer: Arc<dyn Mailer> = if config.smtp.enabled {
            Arc::new(SmtpMailer::new(&config.smtp, &config.portal_url)?)
        } else {
            tracing::warn!("SMTP disabled, invitations will only be logged");
            Arc::new(LogMailer::new(&config.portal_url))
        };

        Ok(Self {
            customers,
            accountants,
            mailer,
        })
    }
}

/// Build the HTTP router with routes and middleware.
///
/// `environment` decides how much error detail reaches clients.
pub fn build_router(state: AppState, environment: Environment) -> Router {
    use handlers::{accountants, customers, health};

    // Routes authenticated with the x-access-token header
    let accountant_routes = Router::new()
        .route(
            "/accountant/customers",
            post(customers::create_customer).get(customers::list_customers),
        )
        .route(
            "/accountant/customers/{id}",
            get(customers::get_customer)
                .put(customers::update_customer)
                .delete(customers::delete_customer),
        )
        .route(
            "/accountant/customers/{id}/invitation",
            put(customers::invite_customer),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::access_token_guard,
        ));

    // Same handlers, authenticated with a bearer token
    let customer_routes = Router::new()
        .route("/customers", post(customers::create_customer))
        .route("/customers/{id}", get(customers::get_customer))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::bearer_guard,
        ));

    Router::new()
        // Public routes (no authentication required)
        .route("/health", get(health::health_check))
        .route("/accountants", post(accountants::register_accountant))
        .merge(accountant_routes)
        .merge(customer_routes)
        .fallback(middleware::errors::not_found)
        // After the merges so every route above gets it
        .method_not_allowed_fallback(middleware::errors::not_found)
        // Last stop for every error response, including the fallback's
        .layer(axum_middleware::from_fn_with_state(
            environment,
            middleware::errors::render_errors,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

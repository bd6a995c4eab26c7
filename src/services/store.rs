//! Entity store interfaces.
//!
//! Handlers talk to storage only through these traits, so the same routes run
//! against PostgreSQL in production and against [`MemoryStore`] in
//! development and tests.
//!
//! [`MemoryStore`]: crate::services::memory::MemoryStore

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    accountant::{Accountant, NewAccountant},
    customer::{Customer, CustomerDraft},
};

/// Failures reported by an entity store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint was violated. Carries the offending field.
    #[error("{0} is already taken")]
    Duplicate(&'static str),

    /// A stored row could not be mapped back into a model.
    #[error("Corrupt record: {0}")]
    Corrupt(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence of customers. Every operation is scoped by the owning accountant.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    async fn insert(&self, customer: Customer) -> Result<Customer, StoreError>;

    /// Returns `None` when the customer does not exist or belongs to someone else.
    async fn find(&self, accountant_id: Uuid, id: Uuid) -> Result<Option<Customer>, StoreError>;

    /// Newest first.
    async fn list(&self, accountant_id: Uuid) -> Result<Vec<Customer>, StoreError>;

    /// Full replace. Returns `false` when no owned customer matched.
    async fn replace(
        &self,
        accountant_id: Uuid,
        id: Uuid,
        draft: CustomerDraft,
    ) -> Result<bool, StoreError>;

    /// Returns whether a record was removed.
    async fn delete(&self, accountant_id: Uuid, id: Uuid) -> Result<bool, StoreError>;

    /// Connectivity check for the health endpoint.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Persistence of accountants and their access tokens.
#[async_trait]
pub trait AccountantStore: Send + Sync {
    /// Stores the accountant and its first access token together.
    async fn register(&self, accountant: NewAccountant) -> Result<Accountant, StoreError>;

    async fn find(&self, id: Uuid) -> Result<Option<Accountant>, StoreError>;

    /// Resolve an active token hash to its accountant.
    async fn find_by_token(&self, token_hash: &str) -> Result<Option<Accountant>, StoreError>;
}

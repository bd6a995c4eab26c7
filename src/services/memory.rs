//! In-memory entity stores, used when no `DATABASE_URL` is configured.
//!
//! Data lives for the lifetime of the process.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    models::{
        accountant::{Accountant, NewAccountant},
        customer::{Customer, CustomerDraft},
    },
    services::store::{AccountantStore, CustomerStore, StoreError},
};

#[derive(Debug, Default)]
pub struct MemoryStore {
    customers: RwLock<HashMap<Uuid, Customer>>,
    accountants: RwLock<HashMap<Uuid, Accountant>>,
    /// token hash -> accountant id
    tokens: RwLock<HashMap<String, Uuid>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CustomerStore for MemoryStore {
    async fn insert(&self, customer: Customer) -> Result<Customer, StoreError> {
        self.customers
            .write()
            .await
            .insert(customer.id, customer.clone());

        Ok(customer)
    }

    async fn find(&self, accountant_id: Uuid, id: Uuid) -> Result<Option<Customer>, StoreError> {
        Ok(self
            .customers
            .read()
            .await
            .get(&id)
            .filter(|customer| customer.accountant_id == accountant_id)
            .cloned())
    }

    async fn list(&self, accountant_id: Uuid) -> Result<Vec<Customer>, StoreError> {
        let mut owned: Vec<Customer> = self
            .customers
            .read()
            .await
            .values()
            .filter(|customer| customer.accountant_id == accountant_id)
            .cloned()
            .collect();

        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(owned)
    }

    async fn replace(
        &self,
        accountant_id: Uuid,
        id: Uuid,
        draft: CustomerDraft,
    ) -> Result<bool, StoreError> {
        let mut customers = self.customers.write().await;

        match customers
            .get_mut(&id)
            .filter(|customer| customer.accountant_id == accountant_id)
        {
            Some(customer) => {
                customer.replace_with(draft);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, accountant_id: Uuid, id: Uuid) -> Result<bool, StoreError> {
        let mut customers = self.customers.write().await;

        let owned = customers
            .get(&id)
            .is_some_and(|customer| customer.accountant_id == accountant_id);
        if owned {
            customers.remove(&id);
        }

        Ok(owned)
    }
}

#[async_trait]
impl AccountantStore for MemoryStore {
    async fn register(&self, accountant: NewAccountant) -> Result<Accountant, StoreError> {
        let mut accountants = self.accountants.write().await;

        if accountants
            .values()
            .any(|existing| existing.email.eq_ignore_ascii_case(&accountant.email))
        {
            return Err(StoreError::Duplicate("email"));
        }

        let created = Accountant {
            id: Uuid::new_v4(),
            email: accountant.email,
            password_hash: accountant.password_hash,
            created_at: Utc::now(),
        };

        self.tokens
            .write()
            .await
            .insert(accountant.token_hash, created.id);
        accountants.insert(created.id, created.clone());

        Ok(created)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Accountant>, StoreError> {
        Ok(self.accountants.read().await.get(&id).cloned())
    }

    async fn find_by_token(&self, token_hash: &str) -> Result<Option<Accountant>, StoreError> {
        let accountant_id = self.tokens.read().await.get(token_hash).copied();

        match accountant_id {
            Some(id) => AccountantStore::find(self, id).await,
            None => Ok(None),
        }
    }
}

//! PostgreSQL-backed entity stores.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    db::DbPool,
    models::{
        access_token::AccessToken,
        accountant::{Accountant, NewAccountant},
        customer::{Customer, CustomerDraft, SettlementPeriod},
    },
    services::store::{AccountantStore, CustomerStore, StoreError},
};

/// Customer row as stored. `settlement_period` is TEXT with a CHECK constraint.
#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: Uuid,
    accountant_id: Uuid,
    name: String,
    company_name: String,
    email: String,
    phone: Option<String>,
    tax_id: String,
    settlement_period: String,
    vat_payer: bool,
    social_security_payer: bool,
    has_employees: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = StoreError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        let settlement_period = row
            .settlement_period
            .parse::<SettlementPeriod>()
            .map_err(|_| StoreError::Corrupt(format!("customer {} settlement_period", row.id)))?;

        Ok(Customer {
            id: row.id,
            accountant_id: row.accountant_id,
            name: row.name,
            company_name: row.company_name,
            email: row.email,
            phone: row.phone,
            tax_id: row.tax_id,
            settlement_period,
            vat_payer: row.vat_payer,
            social_security_payer: row.social_security_payer,
            has_employees: row.has_employees,
            created_at: row.created_at,
        })
    }
}

const CUSTOMER_COLUMNS: &str = "id, accountant_id, name, company_name, email, phone, tax_id, \
     settlement_period, vat_payer, social_security_payer, has_employees, created_at";

/// Map a unique-constraint violation to [`StoreError::Duplicate`].
fn duplicate_on(field: &'static str) -> impl Fn(sqlx::Error) -> StoreError {
    move |error| {
        if matches!(&error, sqlx::Error::Database(db) if db.is_unique_violation()) {
            StoreError::Duplicate(field)
        } else {
            StoreError::Database(error)
        }
    }
}

/// Stores backed by a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerStore for PgStore {
    async fn insert(&self, customer: Customer) -> Result<Customer, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO customers (
                id, accountant_id, name, company_name, email, phone, tax_id,
                settlement_period, vat_payer, social_security_payer, has_employees, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {CUSTOMER_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, CustomerRow>(&sql)
            .bind(customer.id)
            .bind(customer.accountant_id)
            .bind(&customer.name)
            .bind(&customer.company_name)
            .bind(&customer.email)
            .bind(&customer.phone)
            .bind(&customer.tax_id)
            .bind(customer.settlement_period.as_str())
            .bind(customer.vat_payer)
            .bind(customer.social_security_payer)
            .bind(customer.has_employees)
            .bind(customer.created_at)
            .fetch_one(&self.pool)
            .await?;

        row.try_into()
    }

    async fn find(&self, accountant_id: Uuid, id: Uuid) -> Result<Option<Customer>, StoreError> {
        // Filter by owner as well as id so other tenants' rows read as missing
        let sql =
            format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1 AND accountant_id = $2");

        sqlx::query_as::<_, CustomerRow>(&sql)
            .bind(id)
            .bind(accountant_id)
            .fetch_optional(&self.pool)
            .await?
            .map(Customer::try_from)
            .transpose()
    }

    async fn list(&self, accountant_id: Uuid) -> Result<Vec<Customer>, StoreError> {
        let sql = format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE accountant_id = $1 ORDER BY created_at DESC"
        );

        sqlx::query_as::<_, CustomerRow>(&sql)
            .bind(accountant_id)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Customer::try_from)
            .collect()
    }

    async fn replace(
        &self,
        accountant_id: Uuid,
        id: Uuid,
        draft: CustomerDraft,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE customers
            SET name = $3,
                company_name = $4,
                email = $5,
                phone = $6,
                tax_id = $7,
                settlement_period = $8,
                vat_payer = $9,
                social_security_payer = $10,
                has_employees = $11
            WHERE id = $1 AND accountant_id = $2
            "#,
        )
        .bind(id)
        .bind(accountant_id)
        .bind(draft.name)
        .bind(draft.company_name)
        .bind(draft.email)
        .bind(draft.phone)
        .bind(draft.tax_id)
        .bind(draft.settlement_period.as_str())
        .bind(draft.vat_payer)
        .bind(draft.social_security_payer)
        .bind(draft.has_employees)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, accountant_id: Uuid, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1 AND accountant_id = $2")
            .bind(id)
            .bind(accountant_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl AccountantStore for PgStore {
    async fn register(&self, accountant: NewAccountant) -> Result<Accountant, StoreError> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Accountant>(
            r#"
            INSERT INTO accountants (id, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&accountant.email)
        .bind(&accountant.password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(duplicate_on("email"))?;

        sqlx::query("INSERT INTO access_tokens (id, accountant_id, token_hash) VALUES ($1, $2, $3)")
            .bind(Uuid::new_v4())
            .bind(created.id)
            .bind(&accountant.token_hash)
            .execute(&mut *tx)
            .await?;

        // Accountant and token become visible together
        tx.commit().await?;

        Ok(created)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Accountant>, StoreError> {
        let accountant = sqlx::query_as::<_, Accountant>(
            "SELECT id, email, password_hash, created_at FROM accountants WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(accountant)
    }

    async fn find_by_token(&self, token_hash: &str) -> Result<Option<Accountant>, StoreError> {
        let token = sqlx::query_as::<_, AccessToken>(
            "SELECT id, accountant_id, token_hash, created_at, is_active
             FROM access_tokens
             WHERE token_hash = $1 AND is_active = true",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        match token {
            Some(token) => AccountantStore::find(self, token.accountant_id).await,
            None => Ok(None),
        }
    }
}

//! Customer data models and API request/response types.
//!
//! This module defines:
//! - `Customer`: a company an accountant keeps the books for
//! - `CustomerPayload`: request body for creating and replacing customers
//! - `CustomerDraft`: a validated payload, ready to be stored
//! - `CustomerResponse`: response body returned to clients

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

/// How often the customer's books are settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettlementPeriod {
    Monthly,
    Quarterly,
}

impl SettlementPeriod {
    pub fn as_str(self) -> &'static str {
        match self {
            SettlementPeriod::Monthly => "monthly",
            SettlementPeriod::Quarterly => "quarterly",
        }
    }
}

impl FromStr for SettlementPeriod {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "monthly" => Ok(SettlementPeriod::Monthly),
            "quarterly" => Ok(SettlementPeriod::Quarterly),
            other => {
                let mut error = ValidationError::new("enum");
                error.message = Some(
                    format!("`{other}` is not a valid settlement period (monthly, quarterly).")
                        .into(),
                );
                Err(error)
            }
        }
    }
}

/// A customer record.
///
/// Every customer belongs to exactly one accountant (`accountant_id`), and
/// every query is filtered by it.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: Uuid,

    /// Owning accountant. Never serialized to clients.
    pub accountant_id: Uuid,

    pub name: String,
    pub company_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub tax_id: String,
    pub settlement_period: SettlementPeriod,
    pub vat_payer: bool,
    pub social_security_payer: bool,
    pub has_employees: bool,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Build a new customer from a draft, stamping owner, id and creation time.
    pub fn new(accountant_id: Uuid, draft: CustomerDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            accountant_id,
            name: draft.name,
            company_name: draft.company_name,
            email: draft.email,
            phone: draft.phone,
            tax_id: draft.tax_id,
            settlement_period: draft.settlement_period,
            vat_payer: draft.vat_payer,
            social_security_payer: draft.social_security_payer,
            has_employees: draft.has_employees,
            created_at: Utc::now(),
        }
    }

    /// Replace every client-editable field. Identity, owner and creation time stay.
    pub fn replace_with(&mut self, draft: CustomerDraft) {
        self.name = draft.name;
        self.company_name = draft.company_name;
        self.email = draft.email;
        self.phone = draft.phone;
        self.tax_id = draft.tax_id;
        self.settlement_period = draft.settlement_period;
        self.vat_payer = draft.vat_payer;
        self.social_security_payer = draft.social_security_payer;
        self.has_employees = draft.has_employees;
    }
}

/// Request body for creating or replacing a customer.
///
/// # JSON Example
///
/// ```json
/// {
///   "name": "Jan Kowalski",
///   "company_name": "PolKrak",
///   "email": "kowalski@gmail.com",
///   "phone": "+48 333 222 111",
///   "tax_id": "PL123432134",
///   "settlement_period": "quarterly",
///   "vat_payer": true,
///   "social_security_payer": true,
///   "has_employees": false
/// }
/// ```
///
/// Every field is optional at the JSON level. A missing field is
/// reported by validation, keyed by its name, instead of failing the parse.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CustomerPayload {
    #[validate(
        required(message = "Path `name` is required."),
        length(min = 1, message = "Path `name` is required.")
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "Path `company_name` is required."),
        length(min = 1, message = "Path `company_name` is required.")
    )]
    pub company_name: Option<String>,

    #[validate(
        required(message = "Path `email` is required."),
        email(message = "Path `email` must be a valid email address.")
    )]
    pub email: Option<String>,

    pub phone: Option<String>,

    #[validate(
        required(message = "Path `tax_id` is required."),
        length(min = 1, message = "Path `tax_id` is required.")
    )]
    pub tax_id: Option<String>,

    #[validate(required(message = "Path `settlement_period` is required."))]
    pub settlement_period: Option<String>,

    #[serde(default)]
    pub vat_payer: bool,

    #[serde(default)]
    pub social_security_payer: bool,

    #[serde(default)]
    pub has_employees: bool,
}

/// A customer payload that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerDraft {
    pub name: String,
    pub company_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub tax_id: String,
    pub settlement_period: SettlementPeriod,
    pub vat_payer: bool,
    pub social_security_payer: bool,
    pub has_employees: bool,
}

impl TryFrom<CustomerPayload> for CustomerDraft {
    type Error = ValidationErrors;

    /// Validate every field at once so the client sees all problems together.
    fn try_from(payload: CustomerPayload) -> Result<Self, Self::Error> {
        let mut errors = match payload.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        let parsed = payload
            .settlement_period
            .as_deref()
            .map(str::parse::<SettlementPeriod>);
        let settlement_period = match parsed {
            Some(Ok(period)) => Some(period),
            Some(Err(error)) => {
                errors.add("settlement_period", error);
                None
            }
            None => None,
        };

        let (Some(name), Some(company_name), Some(email), Some(tax_id), Some(settlement_period)) = (
            payload.name,
            payload.company_name,
            payload.email,
            payload.tax_id,
            settlement_period,
        ) else {
            return Err(errors);
        };

        if !errors.errors().is_empty() {
            return Err(errors);
        }

        Ok(Self {
            name,
            company_name,
            email,
            phone: payload.phone.filter(|phone| !phone.trim().is_empty()),
            tax_id,
            settlement_period,
            vat_payer: payload.vat_payer,
            social_security_payer: payload.social_security_payer,
            has_employees: payload.has_employees,
        })
    }
}

/// Response body for customer endpoints.
///
/// # JSON Example
///
/// ```json
/// {
///   "_id": "550e8400-e29b-41d4-a716-446655440000",
///   "name": "Jan Kowalski",
///   "company_name": "PolKrak",
///   "email": "kowalski@gmail.com",
///   "phone": "+48 333 222 111",
///   "tax_id": "PL123432134",
///   "settlement_period": "quarterly",
///   "vat_payer": true,
///   "social_security_payer": true,
///   "has_employees": false,
///   "created_at": "2016-01-30T22:44:22.353Z"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub company_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub tax_id: String,
    pub settlement_period: SettlementPeriod,
    pub vat_payer: bool,
    pub social_security_payer: bool,
    pub has_employees: bool,
    pub created_at: DateTime<Utc>,
}

/// Convert a stored Customer to the API response (drops the owner id).
impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id,
            name: customer.name,
            company_name: customer.company_name,
            email: customer.email,
            phone: customer.phone,
            tax_id: customer.tax_id,
            settlement_period: customer.settlement_period,
            vat_payer: customer.vat_payer,
            social_security_payer: customer.social_security_payer,
            has_employees: customer.has_employees,
            created_at: customer.created_at,
        }
    }
}

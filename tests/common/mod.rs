#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use rust_bookkeeping_web_server::{
    AppState, build_router,
    config::Environment,
    models::{accountant::Accountant, customer::Customer},
    services::{
        mailer::{MailError, Mailer},
        memory::MemoryStore,
        store::AccountantStore,
        tokens::hash_token,
    },
};
use serde_json::{Value, json};
use tower::util::ServiceExt;
use uuid::Uuid;

/// Records every invitation instead of sending it.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<(Uuid, Uuid)>>,
    pub fail: bool,
}

impl RecordingMailer {
    pub fn calls(&self) -> Vec<(Uuid, Uuid)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_invitation(
        &self,
        accountant: &Accountant,
        customer: &Customer,
    ) -> Result<(), MailError> {
        self.sent.lock().unwrap().push((accountant.id, customer.id));

        if self.fail {
            Err(MailError::Transport("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub mailer: Arc<RecordingMailer>,
    pub store: Arc<MemoryStore>,
}

pub enum Auth<'a> {
    None,
    AccessToken(&'a str),
    Bearer(&'a str),
}

impl TestApp {
    pub fn spawn() -> Self {
        Self::build(Environment::Development, false)
    }

    pub fn build(environment: Environment, failing_mailer: bool) -> Self {
        let store = Arc::new(MemoryStore::new());
        let mailer = Arc::new(RecordingMailer {
            fail: failing_mailer,
            ..Default::default()
        });

        let state = AppState {
            customers: store.clone(),
            accountants: store.clone(),
            mailer: mailer.clone(),
        };

        TestApp {
            router: build_router(state, environment),
            mailer,
            store,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        auth: Auth<'_>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        builder = match auth {
            Auth::None => builder,
            Auth::AccessToken(token) => builder.header("x-access-token", token),
            Auth::Bearer(token) => builder.header("Authorization", format!("Bearer {}", token)),
        };

        let body = match body {
            Some(json) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }

    /// Register an accountant and return its access token.
    pub async fn register(&self, email: &str) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/accountants",
                Auth::None,
                Some(json!({ "email": email, "password": "some-password" })),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED);
        body["token"].as_str().unwrap().to_string()
    }

    /// Id of the accountant the token belongs to.
    pub async fn accountant_id(&self, token: &str) -> Uuid {
        self.store
            .find_by_token(&hash_token(token))
            .await
            .unwrap()
            .unwrap()
            .id
    }

    /// Create a customer and return its JSON.
    pub async fn create_customer(&self, token: &str, payload: Value) -> Value {
        let (status, body) = self
            .request(
                Method::POST,
                "/accountant/customers",
                Auth::AccessToken(token),
                Some(payload),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        body
    }
}

pub fn kowalski() -> Value {
    json!({
        "name": "Jan Kowalski",
        "company_name": "PolKrak",
        "email": "kowalski@gmail.com",
        "phone": "+48 333 222 111",
        "tax_id": "PL123432134",
        "settlement_period": "quarterly",
        "vat_payer": true,
        "social_security_payer": true,
        "has_employees": false
    })
}

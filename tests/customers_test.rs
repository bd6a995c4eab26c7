mod common;

use axum::http::{Method, StatusCode};
use common::{Auth, TestApp, kowalski};
use serde_json::{Value, json};

fn customer_uri(customer: &Value) -> String {
    format!("/accountant/customers/{}", customer["_id"].as_str().unwrap())
}

// =============================================================================
// Create / read
// =============================================================================

#[tokio::test]
async fn create_returns_the_customer_with_id_and_timestamp() {
    let app = TestApp::spawn();
    let token = app.register("books@example.com").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/accountant/customers",
            Auth::AccessToken(&token),
            Some(kowalski()),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    for (field, value) in kowalski().as_object().unwrap() {
        assert_eq!(&body[field], value, "field {field}");
    }
    assert!(body["_id"].is_string());
    assert!(body["created_at"].is_string());
    assert!(body.get("accountant_id").is_none());
}

#[tokio::test]
async fn created_customer_reads_back_unchanged() {
    let app = TestApp::spawn();
    let token = app.register("books@example.com").await;
    let created = app.create_customer(&token, kowalski()).await;

    let (status, fetched) = app
        .request(
            Method::GET,
            &customer_uri(&created),
            Auth::AccessToken(&token),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn optional_fields_take_their_defaults() {
    let app = TestApp::spawn();
    let token = app.register("books@example.com").await;

    let created = app
        .create_customer(
            &token,
            json!({
                "name": "Anna Nowak",
                "company_name": "Nowak Sp. z o.o.",
                "email": "anna@nowak.pl",
                "tax_id": "PL9876543210",
                "settlement_period": "monthly"
            }),
        )
        .await;

    assert_eq!(created["phone"], Value::Null);
    assert_eq!(created["vat_payer"], false);
    assert_eq!(created["social_security_payer"], false);
    assert_eq!(created["has_employees"], false);
}

#[tokio::test]
async fn unknown_customer_is_not_found() {
    let app = TestApp::spawn();
    let token = app.register("books@example.com").await;

    let (status, body) = app
        .request(
            Method::GET,
            &format!("/accountant/customers/{}", uuid::Uuid::new_v4()),
            Auth::AccessToken(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Customer not found");

    let (status, _) = app
        .request(
            Method::GET,
            "/accountant/customers/not-a-uuid",
            Auth::AccessToken(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_returns_only_own_customers() {
    let app = TestApp::spawn();
    let owner = app.register("owner@example.com").await;
    let stranger = app.register("stranger@example.com").await;

    let first = app.create_customer(&owner, kowalski()).await;
    let mut second_payload = kowalski();
    second_payload["name"] = json!("Anna Nowak");
    let second = app.create_customer(&owner, second_payload).await;
    app.create_customer(&stranger, kowalski()).await;

    let (status, body) = app
        .request(
            Method::GET,
            "/accountant/customers",
            Auth::AccessToken(&owner),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|customer| customer["_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&first["_id"].as_str().unwrap()));
    assert!(ids.contains(&second["_id"].as_str().unwrap()));
}

// =============================================================================
// Ownership isolation
// =============================================================================

#[tokio::test]
async fn customers_of_another_accountant_are_invisible() {
    let app = TestApp::spawn();
    let owner = app.register("owner@example.com").await;
    let stranger = app.register("stranger@example.com").await;
    let created = app.create_customer(&owner, kowalski()).await;
    let uri = customer_uri(&created);

    let (status, body) = app
        .request(Method::GET, &uri, Auth::AccessToken(&stranger), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.get("name").is_none());

    let mut hijack = kowalski();
    hijack["name"] = json!("Hijacked");
    let (status, _) = app
        .request(Method::PUT, &uri, Auth::AccessToken(&stranger), Some(hijack))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .request(Method::DELETE, &uri, Auth::AccessToken(&stranger), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Still there, untouched
    let (status, body) = app
        .request(Method::GET, &uri, Auth::AccessToken(&owner), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, created);
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn update_replaces_the_customer() {
    let app = TestApp::spawn();
    let token = app.register("books@example.com").await;
    let created = app.create_customer(&token, kowalski()).await;
    let uri = customer_uri(&created);

    let mut replacement = kowalski();
    replacement["settlement_period"] = json!("monthly");
    replacement["has_employees"] = json!(true);
    replacement["phone"] = Value::Null;

    let (status, body) = app
        .request(
            Method::PUT,
            &uri,
            Auth::AccessToken(&token),
            Some(replacement),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (_, fetched) = app
        .request(Method::GET, &uri, Auth::AccessToken(&token), None)
        .await;
    assert_eq!(fetched["settlement_period"], "monthly");
    assert_eq!(fetched["has_employees"], true);
    assert_eq!(fetched["phone"], Value::Null);
    assert_eq!(fetched["_id"], created["_id"]);
    assert_eq!(fetched["created_at"], created["created_at"]);
}

#[tokio::test]
async fn update_with_missing_field_is_rejected_without_writing() {
    let app = TestApp::spawn();
    let token = app.register("books@example.com").await;
    let created = app.create_customer(&token, kowalski()).await;
    let uri = customer_uri(&created);

    let mut incomplete = kowalski();
    incomplete.as_object_mut().unwrap().remove("tax_id");
    incomplete["name"] = json!("Changed");

    let (status, body) = app
        .request(Method::PUT, &uri, Auth::AccessToken(&token), Some(incomplete))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "ValidationError");
    assert_eq!(body["errors"]["tax_id"]["kind"], "required");
    assert_eq!(body["errors"]["tax_id"]["path"], "tax_id");
    assert!(body["errors"].get("name").is_none());

    let (_, fetched) = app
        .request(Method::GET, &uri, Auth::AccessToken(&token), None)
        .await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn update_of_unknown_customer_is_not_found() {
    let app = TestApp::spawn();
    let token = app.register("books@example.com").await;

    let (status, _) = app
        .request(
            Method::PUT,
            &format!("/accountant/customers/{}", uuid::Uuid::new_v4()),
            Auth::AccessToken(&token),
            Some(kowalski()),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn delete_is_idempotent() {
    let app = TestApp::spawn();
    let token = app.register("books@example.com").await;
    let created = app.create_customer(&token, kowalski()).await;
    let uri = customer_uri(&created);

    for _ in 0..2 {
        let (status, body) = app
            .request(Method::DELETE, &uri, Auth::AccessToken(&token), None)
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);
    }

    let (status, _) = app
        .request(Method::GET, &uri, Auth::AccessToken(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .request(
            Method::DELETE,
            "/accountant/customers/not-a-uuid",
            Auth::AccessToken(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

// =============================================================================
// Invitation
// =============================================================================

#[tokio::test]
async fn invitation_dispatches_exactly_once() {
    let app = TestApp::spawn();
    let token = app.register("books@example.com").await;
    let created = app.create_customer(&token, kowalski()).await;

    let (status, body) = app
        .request(
            Method::PUT,
            &format!("{}/invitation", customer_uri(&created)),
            Auth::AccessToken(&token),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let accountant_id = app.accountant_id(&token).await;
    let customer_id: uuid::Uuid = created["_id"].as_str().unwrap().parse().unwrap();
    assert_eq!(app.mailer.calls(), vec![(accountant_id, customer_id)]);
}

#[tokio::test]
async fn failed_dispatch_is_an_error() {
    let app = TestApp::build(
        rust_bookkeeping_web_server::config::Environment::Development,
        true,
    );
    let token = app.register("books@example.com").await;
    let created = app.create_customer(&token, kowalski()).await;

    let (status, body) = app
        .request(
            Method::PUT,
            &format!("{}/invitation", customer_uri(&created)),
            Auth::AccessToken(&token),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Failed to send invitation");
    assert_eq!(app.mailer.calls().len(), 1);
}

#[tokio::test]
async fn invitation_for_foreign_customer_sends_nothing() {
    let app = TestApp::spawn();
    let owner = app.register("owner@example.com").await;
    let stranger = app.register("stranger@example.com").await;
    let created = app.create_customer(&owner, kowalski()).await;

    let (status, _) = app
        .request(
            Method::PUT,
            &format!("{}/invitation", customer_uri(&created)),
            Auth::AccessToken(&stranger),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(app.mailer.calls().is_empty());
}

// =============================================================================
// Bearer-guarded variants
// =============================================================================

#[tokio::test]
async fn customer_routes_accept_bearer_tokens() {
    let app = TestApp::spawn();
    let token = app.register("books@example.com").await;

    let (status, created) = app
        .request(
            Method::POST,
            "/customers",
            Auth::Bearer(&token),
            Some(kowalski()),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, fetched) = app
        .request(
            Method::GET,
            &format!("/customers/{}", created["_id"].as_str().unwrap()),
            Auth::Bearer(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn bearer_reads_are_scoped_by_owner() {
    let app = TestApp::spawn();
    let owner = app.register("owner@example.com").await;
    let stranger = app.register("stranger@example.com").await;
    let created = app.create_customer(&owner, kowalski()).await;

    let (status, _) = app
        .request(
            Method::GET,
            &format!("/customers/{}", created["_id"].as_str().unwrap()),
            Auth::Bearer(&stranger),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

//! Request extractors with rejections expressed as [`AppError`].

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::{ValidationError, ValidationErrors};

use crate::error::AppError;

/// JSON body whose parse failures are reported as validation errors.
///
/// Axum's own `Json` rejects with plain-text bodies; this keeps every
/// malformed payload inside the `{ code: "ValidationError", errors }` shape,
/// keyed by `body`.
///
/// A body sent without a JSON content type is read as `{}`, so payloads with
/// optional fields go on to report their missing fields one by one.
pub struct Payload<T>(pub T);

impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Payload(value)),
            Err(JsonRejection::JsonDataError(e)) => Err(malformed_body("type", e.body_text())),
            Err(JsonRejection::JsonSyntaxError(e)) => Err(malformed_body("syntax", e.body_text())),
            Err(JsonRejection::MissingJsonContentType(e)) => {
                serde_json::from_value(Value::Object(Map::new()))
                    .map(Payload)
                    .map_err(|_| malformed_body("type", e.body_text()))
            }
            Err(rejection) => Err(AppError::InvalidRequest(
                rejection.status(),
                rejection.body_text(),
            )),
        }
    }
}

fn malformed_body(code: &'static str, detail: String) -> AppError {
    let mut error = ValidationError::new(code);
    error.message = Some(detail.into());

    let mut errors = ValidationErrors::new();
    errors.add("body", error);

    AppError::Validation(errors)
}

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

use models::errors::ModelError;
use service::errors::{FieldErrors, ServiceError};

/// Error body: `{"error": "...", "message": "...", "fields": {"email": ["..."]}}`.
#[derive(Debug, Serialize)]
pub struct JsonApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: &'static str, message: Option<String>) -> Self {
        Self { status, error, message, fields: None }
    }

    pub fn not_found(what: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not Found", Some(format!("{what} not found")))
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        if e.is_client_error() {
            debug!(error = %e, "request rejected");
        }
        match e {
            ServiceError::Validation(msg) | ServiceError::Model(ModelError::Validation(msg)) => {
                Self::new(StatusCode::BAD_REQUEST, "Validation Error", Some(msg))
            }
            ServiceError::FieldValidation(fields) => Self {
                status: StatusCode::BAD_REQUEST,
                error: "Validation Error",
                message: None,
                fields: Some(fields),
            },
            ServiceError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, "Not Found", Some(msg)),
            ServiceError::Conflict(msg) | ServiceError::Singleton(msg) => {
                Self::new(StatusCode::CONFLICT, "Conflict", Some(msg))
            }
            other => {
                // storage and media faults stay in the log
                error!(error = %other, "request failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", None)
            }
        }
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(rej: JsonRejection) -> Self {
        let text = rej.body_text();
        let fields = match &rej {
            JsonRejection::JsonDataError(_) => data_error_field(&text),
            _ => None,
        };
        Self { status: StatusCode::BAD_REQUEST, error: "Bad Request", message: Some(text), fields }
    }
}

/// `"...target type: phone: invalid type: ..."` becomes `{"phone": ["invalid type: ..."]}`.
/// Errors without a field path (missing field, wrong top-level type) yield `None`.
fn data_error_field(text: &str) -> Option<FieldErrors> {
    let (_, detail) = text.split_once("target type: ")?;
    let (path, msg) = detail.split_once(": ")?;
    let is_path = !path.is_empty()
        && path.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '[' | ']'));
    if !is_path {
        return None;
    }
    Some(FieldErrors::from([(path.to_string(), vec![msg.to_string()])]))
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("runtime check failed: {0}")]
    Runtime(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_service_errors_to_status() {
        let cases = [
            (ServiceError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (ServiceError::Model(ModelError::Validation("rating".into())), StatusCode::BAD_REQUEST),
            (ServiceError::not_found("project"), StatusCode::NOT_FOUND),
            (ServiceError::Singleton("exists".into()), StatusCode::CONFLICT),
            (ServiceError::Conflict("slug".into()), StatusCode::CONFLICT),
            (ServiceError::Db("connection refused".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(JsonApiError::from(err).status, status);
        }
    }

    #[test]
    fn storage_fault_does_not_leak_details() {
        let e = JsonApiError::from(ServiceError::Db("password authentication failed".into()));
        assert!(e.message.is_none());
        let body = serde_json::to_value(&e).unwrap();
        assert_eq!(body, serde_json::json!({"error": "Internal Server Error"}));
    }

    #[test]
    fn data_error_text_yields_field_path() {
        let f = data_error_field(
            "Failed to deserialize the JSON body into the target type: phone: invalid type: integer `6`, expected a string at line 1 column 12",
        )
        .unwrap();
        assert_eq!(f["phone"], vec!["invalid type: integer `6`, expected a string at line 1 column 12".to_string()]);

        assert!(data_error_field(
            "Failed to deserialize the JSON body into the target type: invalid type: sequence, expected struct ContactSubmission at line 1 column 1"
        )
        .is_none());
    }
}

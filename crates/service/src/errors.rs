use std::collections::BTreeMap;

use thiserror::Error;

/// Per-field validation messages, keyed by field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("validation failed on fields: {}", .0.keys().cloned().collect::<Vec<_>>().join(", "))]
    FieldValidation(FieldErrors),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("singleton violation: {0}")]
    Singleton(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
    #[error("media error: {0}")]
    Media(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    /// Client-caused errors: never logged as system faults.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ServiceError::Validation(_)
                | ServiceError::FieldValidation(_)
                | ServiceError::NotFound(_)
                | ServiceError::Conflict(_)
                | ServiceError::Singleton(_)
                | ServiceError::Model(models::errors::ModelError::Validation(_))
        )
    }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self { ServiceError::Db(e.to_string()) }
}

/// Reject blank required text, returning the trimmed value.
pub(crate) fn required(field: &str, value: &str) -> Result<String, ServiceError> {
    let v = value.trim();
    if v.is_empty() {
        return Err(ServiceError::Validation(format!("{field} required")));
    }
    Ok(v.to_string())
}

/// `required`, plus a column-width check counted in characters.
pub(crate) fn required_max(field: &str, value: &str, max: usize) -> Result<String, ServiceError> {
    let v = required(field, value)?;
    if v.chars().count() > max {
        return Err(ServiceError::Validation(format!("{field} longer than {max} characters")));
    }
    Ok(v)
}

//! Service layer: content-store operations on top of `models`, plus the
//! offline import pipeline.
//! - Each entity module owns its ordering rules and cascade behavior.
//! - Validation lives here or in `models`; storage faults surface as `ServiceError::Db`.

pub mod errors;
mod slugs;
pub mod company_info;
pub mod catalog;
pub mod projects;
pub mod testimonials;
pub mod gallery;
pub mod contact;
pub mod notify;
pub mod media;
pub mod crop;
pub mod import;
pub mod seed;
#[cfg(test)]
pub mod test_support;

pub(crate) fn default_true() -> bool { true }

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use service::notify::ContactNotifier;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub notifier: ContactNotifier,
    /// Public prefix stored media references are resolved against.
    pub media_base_url: Arc<str>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, notifier: ContactNotifier, media_base_url: impl Into<String>) -> Self {
        Self { db, notifier, media_base_url: Arc::from(media_base_url.into()) }
    }
}

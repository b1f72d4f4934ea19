use std::time::Duration;

use configs::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

/// Connect using the pool settings from `config.toml`.
pub async fn connect_with_config(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let mut opt = ConnectOptions::new(cfg.url.clone());
    opt.max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(cfg.max_lifetime_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .sqlx_logging(cfg.sqlx_logging);
    if cfg.is_sqlite() {
        // SQLite serializes writers anyway; one connection avoids "database is locked"
        opt.max_connections(1).min_connections(1);
    }
    let db = Database::connect(opt).await?;
    info!(sqlite = cfg.is_sqlite(), "database connected");
    Ok(db)
}

/// Private in-memory SQLite database (tests, dry runs).
///
/// Pinned to a single pooled connection: every new connection to `sqlite::memory:`
/// would otherwise open a fresh, empty database.
pub async fn connect_sqlite_memory() -> anyhow::Result<DatabaseConnection> {
    let mut opt = ConnectOptions::new("sqlite::memory:".to_string());
    opt.max_connections(1)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .sqlx_logging(false);
    Ok(Database::connect(opt).await?)
}

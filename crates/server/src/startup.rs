use std::{net::SocketAddr, path::{Path, PathBuf}};

use axum::Router;
use common::{env::ensure_env, utils::logging::init_logging_default};
use configs::AppConfig;
use dotenvy::dotenv;
use migration::{Migrator, MigratorTrait};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use service::media::MediaStore;
use service::notify::ContactNotifier;

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Directory holding a file-backed SQLite database, if `url` names one.
fn sqlite_data_dir(url: &str) -> Option<PathBuf> {
    let rest = url.strip_prefix("sqlite://").or_else(|| url.strip_prefix("sqlite:"))?;
    let file = rest.split('?').next().unwrap_or_default();
    if file.is_empty() || file == ":memory:" {
        return None;
    }
    Path::new(file).parent().filter(|p| !p.as_os_str().is_empty()).map(Path::to_path_buf)
}

/// Runs until Ctrl+C, then drains in-flight requests.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl+C; shutdown only by termination");
        std::future::pending::<()>().await;
    }
    info!("received Ctrl+C, shutting down");
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_default();

    let cfg = AppConfig::load_or_env().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;

    let media_root = PathBuf::from(&cfg.media.root);
    let data_dir = sqlite_data_dir(&cfg.database.url);
    let mut required = vec![media_root.as_path()];
    if let Some(dir) = data_dir.as_deref() {
        required.push(dir);
    }
    ensure_env(&required, &[Path::new(&cfg.import.source_dir)]).await?;
    MediaStore::new(&media_root).ensure_layout().await?;

    let db = models::db::connect_with_config(&cfg.database).await?;
    Migrator::up(&db, None)
        .await
        .map_err(|e| StartupError::Runtime(format!("migration failed: {e}")))?;

    let notifier = ContactNotifier::from_config(&cfg.notify).map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    if !notifier.is_enabled() {
        warn!("notify.owner_email not set; contact messages are stored without notification");
    }

    let state = AppState::new(db, notifier, cfg.media.base_url.clone());
    let app: Router = routes::build_router(state, build_cors(), &media_root);

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bad bind address: {e}")))?;
    info!(%addr, media_root = %media_root.display(), "starting cms server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}

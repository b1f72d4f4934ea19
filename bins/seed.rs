//! Load bundled demo content into the configured database.

use std::process::ExitCode;

use clap::Parser;
use dotenvy::dotenv;
use migration::{Migrator, MigratorTrait};
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "cms-seed", about = "Seed demo company info, services, projects and testimonials")]
struct Args {
    /// Delete existing content first
    #[arg(long)]
    clear: bool,
}

fn main() -> ExitCode {
    dotenv().ok();
    common::utils::logging::init_logging_default();
    let args = Args::parse();

    let rt = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };
    match rt.block_on(run(args.clear)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(event = "seed_failed", error = %e, "seeding failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(clear: bool) -> anyhow::Result<()> {
    let cfg = configs::AppConfig::load_or_env()?;
    let db = models::db::connect_with_config(&cfg.database).await?;
    Migrator::up(&db, None).await?;
    let report = service::seed::seed_demo(&db, clear).await?;
    info!(?report, "seed complete");
    Ok(())
}

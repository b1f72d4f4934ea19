//! Batch import of project photos: crops scanner margins and (re)creates
//! services, projects and hero images from a TOML manifest.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use dotenvy::dotenv;
use migration::{Migrator, MigratorTrait};
use tracing::{error, info, warn};

use configs::{AppConfig, MarginMatch};
use service::crop::MarginSpec;
use service::import::{load_manifest, Importer};
use service::media::MediaStore;

#[derive(Debug, Parser)]
#[command(name = "cms-import", about = "Import project folders and crop their margins")]
struct Args {
    /// Manifest describing services, projects and hero picks (default: import.manifest)
    #[arg(long)]
    manifest: Option<PathBuf>,
    /// Directory with one folder per project (default: import.source_dir)
    #[arg(long)]
    source: Option<PathBuf>,
    /// Treat a pixel as margin when it matches any reference color
    #[arg(long)]
    any_color: bool,
}

fn main() -> ExitCode {
    dotenv().ok();
    common::utils::logging::init_logging_json();
    let args = Args::parse();

    let rt = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };
    match rt.block_on(run(args)) {
        Ok(failed) if failed == 0 => ExitCode::SUCCESS,
        Ok(failed) => {
            warn!(failed, "import finished with failures");
            ExitCode::from(2)
        }
        Err(e) => {
            error!(event = "import_failed", error = %e, "import aborted");
            ExitCode::FAILURE
        }
    }
}

/// Returns the number of failed projects.
async fn run(args: Args) -> anyhow::Result<usize> {
    let cfg = AppConfig::load_or_env()?;
    let manifest_path = args.manifest.unwrap_or_else(|| PathBuf::from(&cfg.import.manifest));
    let source_dir = args.source.unwrap_or_else(|| PathBuf::from(&cfg.import.source_dir));
    if !source_dir.is_dir() {
        anyhow::bail!("source directory {} not found", source_dir.display());
    }

    let manifest = load_manifest(&manifest_path).await?;
    let mut spec = MarginSpec::from_config(&cfg.import);
    if args.any_color {
        spec.mode = MarginMatch::Any;
    }

    let db = models::db::connect_with_config(&cfg.database).await?;
    Migrator::up(&db, None).await?;

    info!(
        manifest = %manifest_path.display(),
        source = %source_dir.display(),
        projects = manifest.projects.len(),
        "import starting"
    );
    let importer = Importer::new(db, MediaStore::new(&cfg.media.root), source_dir, spec);
    let report = importer.run(&manifest).await?;
    info!(?report, "import finished");
    Ok(report.projects_failed)
}

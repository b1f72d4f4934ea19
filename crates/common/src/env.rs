//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;

use tracing::warn;

/// Create every `required` directory; only warn about missing `optional` ones.
pub async fn ensure_env(required: &[&Path], optional: &[&Path]) -> anyhow::Result<()> {
    for dir in optional {
        if tokio::fs::metadata(dir).await.is_err() {
            warn!(dir = %dir.display(), "optional directory not found");
        }
    }
    for dir in required {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", dir.display()))?;
    }
    Ok(())
}

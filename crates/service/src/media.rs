//! Filesystem media store.
//!
//! Stored references are paths relative to the media root, e.g.
//! `projects/featured/projet-1_IMG_0001.jpg`; clients get them joined onto `base_url`.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaRole {
    Featured,
    Before,
    ProjectGallery,
    SiteGallery,
}

impl MediaRole {
    pub const ALL: [MediaRole; 4] = [MediaRole::Featured, MediaRole::Before, MediaRole::ProjectGallery, MediaRole::SiteGallery];

    pub fn folder(&self) -> &'static str {
        match self {
            MediaRole::Featured => "projects/featured",
            MediaRole::Before => "projects/before",
            MediaRole::ProjectGallery => "projects/gallery",
            MediaRole::SiteGallery => "gallery",
        }
    }
}

#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

    pub fn root(&self) -> &Path { &self.root }

    /// Create every role folder under the root.
    pub async fn ensure_layout(&self) -> Result<(), ServiceError> {
        for role in MediaRole::ALL {
            let dir = self.root.join(role.folder());
            tokio::fs::create_dir_all(&dir).await?;
            debug!(path = %dir.display(), "media folder ready");
        }
        Ok(())
    }

    /// Relative reference for `file_name` stored under `role`.
    pub fn reference(role: MediaRole, file_name: &str) -> String { format!("{}/{}", role.folder(), file_name) }

    /// Absolute filesystem path of a stored reference.
    pub fn path_of(&self, reference: &str) -> PathBuf { self.root.join(reference) }
}

/// File name for a project's featured or before image.
pub fn project_file_name(slug: &str, source_name: &str) -> String { format!("{slug}_{source_name}") }

/// File name for a project gallery image at `order`.
pub fn gallery_file_name(slug: &str, order: usize, source_name: &str) -> String { format!("{slug}_{order}_{source_name}") }

/// File name for a sitewide hero image picked from `folder`.
pub fn hero_file_name(folder: &str, source_name: &str) -> String { format!("hero_{folder}_{source_name}") }

/// Absolute URL for a stored reference. Empty references resolve to `None`;
/// references that are already absolute URLs pass through.
pub fn resolve_media_url(base_url: &str, reference: &str) -> Option<String> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }
    let lower = reference.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return Some(reference.to_string());
    }
    Some(format!("{}/{}", base_url.trim_end_matches('/'), reference.trim_start_matches('/')))
}

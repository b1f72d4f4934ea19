//! Offline import of staged project photographs.
//!
//! The manifest (TOML) names the services to ensure, the projects to (re)create and the
//! hero gallery picks. Source folders are `{n}a`/`{n}b` (after/before) for before-after
//! projects and `{n}` otherwise. Re-importing a project replaces it.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::Deserialize;
use tracing::{error, info, warn};

use models::gallery_image::HERO_CATEGORY;

use crate::catalog::{self, NewService};
use crate::crop::{process_file_blocking, CropOutcome, MarginSpec};
use crate::errors::ServiceError;
use crate::gallery::{self, NewGalleryImage};
use crate::media::{gallery_file_name, hero_file_name, project_file_name, MediaRole, MediaStore};
use crate::projects::{self, NewProject, NewProjectImage, ProjectChanges};

pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportManifest {
    #[serde(default)]
    pub services: Vec<NewService>,
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
    #[serde(default)]
    pub hero: Vec<HeroPick>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectEntry {
    pub number: u32,
    pub title: String,
    /// Service slug.
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub surface: String,
    #[serde(default)]
    pub has_before_after: bool,
}

impl ProjectEntry {
    pub fn slug(&self) -> String { format!("projet-{}", self.number) }

    pub fn after_folder(&self) -> String {
        if self.has_before_after { format!("{}a", self.number) } else { self.number.to_string() }
    }

    pub fn before_folder(&self) -> Option<String> { self.has_before_after.then(|| format!("{}b", self.number)) }
}

/// One hero carousel image: the `index`-th image (sorted) of `folder`.
#[derive(Debug, Clone, Deserialize)]
pub struct HeroPick {
    pub folder: String,
    pub index: usize,
    pub title: String,
    /// Slug of the project the image links to.
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub caption: String,
}

pub fn parse_manifest(text: &str) -> Result<ImportManifest, ServiceError> {
    let manifest: ImportManifest =
        toml::from_str(text).map_err(|e| ServiceError::Validation(format!("invalid import manifest: {e}")))?;
    let mut seen = BTreeSet::new();
    for p in &manifest.projects {
        if !seen.insert(p.number) {
            return Err(ServiceError::Validation(format!("project number {} listed twice", p.number)));
        }
    }
    Ok(manifest)
}

pub async fn load_manifest(path: &Path) -> Result<ImportManifest, ServiceError> {
    let text = tokio::fs::read_to_string(path).await?;
    parse_manifest(&text)
}

/// Image files of `dir` sorted by file name. A missing folder yields nothing.
pub async fn list_images(dir: &Path) -> Result<Vec<PathBuf>, ServiceError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut out = Vec::new();
    let mut rd = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = rd.next_entry().await? {
        let path = entry.path();
        let is_image = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
        if is_image && entry.file_type().await?.is_file() {
            out.push(path);
        }
    }
    out.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(out)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub services_created: usize,
    pub projects_imported: usize,
    pub projects_replaced: usize,
    pub projects_failed: usize,
    pub images_written: usize,
    /// Images stored uncropped because they could not be decoded.
    pub fallbacks: usize,
    /// Images skipped because they could not be read or stored.
    pub failures: usize,
    pub hero_images: usize,
}

pub struct Importer {
    db: DatabaseConnection,
    media: MediaStore,
    source_dir: PathBuf,
    spec: MarginSpec,
}

impl Importer {
    pub fn new(db: DatabaseConnection, media: MediaStore, source_dir: impl Into<PathBuf>, spec: MarginSpec) -> Self {
        Self { db, media, source_dir: source_dir.into(), spec }
    }

    /// Run the whole batch. Only setup failures (media root, service table) abort;
    /// per-project and per-image problems are logged and counted.
    pub async fn run(&self, manifest: &ImportManifest) -> Result<ImportReport, ServiceError> {
        let mut report = ImportReport::default();
        self.media.ensure_layout().await?;

        let mut services = HashMap::new();
        for svc in &manifest.services {
            let (model, created) = catalog::ensure_service(&self.db, svc.clone()).await?;
            if created {
                report.services_created += 1;
            }
            services.insert(model.slug.clone(), model.id);
        }

        let mut entries: Vec<&ProjectEntry> = manifest.projects.iter().collect();
        entries.sort_by_key(|p| p.number);
        for entry in entries {
            match self.import_project(entry, &services, &mut report).await {
                Ok(()) => {
                    report.projects_imported += 1;
                    info!(event = "project_imported", number = entry.number, slug = %entry.slug(), title = %entry.title, "project imported");
                }
                Err(e) => {
                    report.projects_failed += 1;
                    error!(number = entry.number, error = %e, "project import failed");
                }
            }
        }

        if let Err(e) = self.import_hero(&manifest.hero, &mut report).await {
            error!(error = %e, "hero gallery import failed");
        }
        info!(?report, "import finished");
        Ok(report)
    }

    async fn import_project(
        &self,
        entry: &ProjectEntry,
        services: &HashMap<String, i32>,
        report: &mut ImportReport,
    ) -> Result<(), ServiceError> {
        let slug = entry.slug();
        let service_id = match entry.service.as_deref() {
            Some(s) => self.service_id(s, services).await?,
            None => None,
        };

        // replace atomically: no window where the slug exists twice or not at all
        let txn = self.db.begin().await?;
        if let Some(old) = projects::get_project_by_slug(&txn, &slug, false).await? {
            warn!(slug = %slug, "project already exists, deleting and recreating");
            projects::purge_project(&txn, old.id).await?;
            report.projects_replaced += 1;
        }
        let project = projects::create_project(
            &txn,
            NewProject {
                title: entry.title.clone(),
                slug: Some(slug.clone()),
                description: entry.description.clone(),
                short_description: entry.short_description.clone(),
                location: entry.location.clone(),
                duration: entry.duration.clone(),
                surface: entry.surface.clone(),
                service_id,
                has_before_after: entry.has_before_after,
                is_featured: entry.has_before_after,
                is_active: true,
                order: entry.number as i32,
                ..NewProject::default()
            },
        )
        .await?;
        txn.commit().await?;

        let after = list_images(&self.source_dir.join(entry.after_folder())).await?;
        if let Some((first, rest)) = after.split_first() {
            let name = project_file_name(&slug, &file_name(first));
            if let Some(reference) = self.store(first, MediaRole::Featured, &name, report).await {
                let changes = ProjectChanges { featured_image: Some(reference), ..Default::default() };
                self.attach(project.id, &slug, changes, report).await;
            }
            for (i, img) in rest.iter().enumerate() {
                let order = i + 1;
                let name = gallery_file_name(&slug, order, &file_name(img));
                let Some(reference) = self.store(img, MediaRole::ProjectGallery, &name, report).await else {
                    continue;
                };
                if let Err(e) = projects::add_project_image(&self.db, project.id, NewProjectImage::new(reference, order as i32)).await {
                    report.failures += 1;
                    error!(slug = %slug, order, error = %e, "could not record gallery image");
                }
            }
        }

        if let Some(folder) = entry.before_folder() {
            let before = list_images(&self.source_dir.join(folder)).await?;
            if let Some(first) = before.first() {
                let name = project_file_name(&slug, &file_name(first));
                if let Some(reference) = self.store(first, MediaRole::Before, &name, report).await {
                    let changes = ProjectChanges { before_image: Some(Some(reference)), ..Default::default() };
                    self.attach(project.id, &slug, changes, report).await;
                }
            }
        }
        Ok(())
    }

    /// Rebuild the hero collection. Order counts down so the first pick sorts last.
    async fn import_hero(&self, picks: &[HeroPick], report: &mut ImportReport) -> Result<(), ServiceError> {
        let cleared = gallery::clear_gallery(&self.db).await?;
        info!(cleared, "cleared existing gallery images");

        for (pos, pick) in picks.iter().enumerate() {
            let images = list_images(&self.source_dir.join(&pick.folder)).await?;
            let Some(src) = images.get(pick.index) else {
                warn!(folder = %pick.folder, index = pick.index, available = images.len(), "hero pick not found, skipped");
                continue;
            };
            let linked = match pick.project.as_deref() {
                Some(slug) => projects::get_project_by_slug(&self.db, slug, false).await?.map(|p| p.id),
                None => None,
            };
            let name = hero_file_name(&pick.folder, &file_name(src));
            let Some(reference) = self.store(src, MediaRole::SiteGallery, &name, report).await else {
                continue;
            };
            let created = gallery::create_gallery_image(
                &self.db,
                NewGalleryImage {
                    title: pick.title.clone(),
                    image: reference,
                    category: HERO_CATEGORY.to_string(),
                    caption: pick.caption.clone(),
                    linked_project_id: linked,
                    is_active: true,
                    order: (picks.len() - pos) as i32,
                },
            )
            .await;
            match created {
                Ok(g) => {
                    report.hero_images += 1;
                    info!(id = g.id, title = %g.title, linked = ?pick.project, "hero image added");
                }
                Err(e) => {
                    report.failures += 1;
                    error!(title = %pick.title, error = %e, "could not record hero image");
                }
            }
        }
        Ok(())
    }

    /// Point the project at a stored file. The file stays on disk when the row update fails.
    async fn attach(&self, project_id: i32, slug: &str, changes: ProjectChanges, report: &mut ImportReport) {
        if let Err(e) = projects::update_project(&self.db, project_id, changes).await {
            report.failures += 1;
            error!(slug = %slug, error = %e, "could not attach image to project");
        }
    }

    /// Crop `src` into the media store; `None` (logged) when nothing could be written.
    async fn store(&self, src: &Path, role: MediaRole, name: &str, report: &mut ImportReport) -> Option<String> {
        let reference = MediaStore::reference(role, name);
        let dest = self.media.path_of(&reference);
        match process_file_blocking(src.to_path_buf(), dest, self.spec.clone()).await {
            Ok(outcome) => {
                if matches!(outcome, CropOutcome::Fallback { .. }) {
                    report.fallbacks += 1;
                }
                report.images_written += 1;
                Some(reference)
            }
            Err(e) => {
                report.failures += 1;
                error!(src = %src.display(), reference = %reference, error = %e, "could not store image");
                None
            }
        }
    }

    async fn service_id(&self, slug: &str, known: &HashMap<String, i32>) -> Result<Option<i32>, ServiceError> {
        if let Some(id) = known.get(slug) {
            return Ok(Some(*id));
        }
        let found = catalog::get_service_by_slug(&self.db, slug, false).await?;
        if found.is_none() {
            warn!(service = slug, "unknown service slug, project left unassigned");
        }
        Ok(found.map(|s| s.id))
    }
}

fn file_name(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
}

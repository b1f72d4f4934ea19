//! Demo content for local development and previews.

use sea_orm::{DatabaseConnection, EntityTrait, TransactionTrait};
use serde::Deserialize;
use tracing::info;

use models::{project, service};

use crate::catalog::{self, NewService};
use crate::company_info::{self, CompanyProfile};
use crate::errors::ServiceError;
use crate::projects::{self, NewProject};
use crate::testimonials::{self, NewTestimonial};

const DEMO_TOML: &str = include_str!("../fixtures/demo.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct DemoData {
    pub company: CompanyProfile,
    #[serde(default)]
    pub services: Vec<NewService>,
    #[serde(default)]
    pub projects: Vec<DemoProject>,
    #[serde(default)]
    pub testimonials: Vec<NewTestimonial>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DemoProject {
    /// Service slug.
    #[serde(default)]
    pub service: Option<String>,
    #[serde(flatten)]
    pub project: NewProject,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub cleared: bool,
    pub company_created: bool,
    pub services_created: usize,
    pub projects_created: usize,
    pub testimonials_created: usize,
}

pub fn demo_data() -> Result<DemoData, ServiceError> {
    toml::from_str(DEMO_TOML).map_err(|e| ServiceError::Validation(format!("invalid demo fixture: {e}")))
}

/// Load the bundled demo content. Existing rows are kept (matched by slug or client
/// name) unless `clear` wipes company info, services, projects and testimonials first.
pub async fn seed_demo(db: &DatabaseConnection, clear: bool) -> Result<SeedReport, ServiceError> {
    let data = demo_data()?;
    let mut report = SeedReport::default();
    if clear {
        clear_content(db).await?;
        report.cleared = true;
    }

    if company_info::get_company_info(db).await?.is_none() {
        company_info::create_company_info(db, data.company).await?;
        report.company_created = true;
    }

    for svc in data.services {
        let (_, created) = catalog::ensure_service(db, svc).await?;
        if created {
            report.services_created += 1;
        }
    }

    for demo in data.projects {
        let slug = models::slug::slugify(&demo.project.title);
        if projects::get_project_by_slug(db, &slug, false).await?.is_some() {
            continue;
        }
        let service_id = match demo.service.as_deref() {
            Some(s) => catalog::get_service_by_slug(db, s, false).await?.map(|s| s.id),
            None => None,
        };
        projects::create_project(db, NewProject { service_id, ..demo.project }).await?;
        report.projects_created += 1;
    }

    let existing: Vec<String> =
        testimonials::list_testimonials(db, false).await?.into_iter().map(|(t, _)| t.client_name).collect();
    for t in data.testimonials {
        if existing.contains(&t.client_name) {
            continue;
        }
        testimonials::create_testimonial(db, t).await?;
        report.testimonials_created += 1;
    }

    info!(?report, "demo data seeded");
    Ok(report)
}

async fn clear_content(db: &DatabaseConnection) -> Result<(), ServiceError> {
    let txn = db.begin().await?;
    let ids: Vec<i32> = project::Entity::find().all(&txn).await?.into_iter().map(|p| p.id).collect();
    for id in &ids {
        projects::purge_project(&txn, *id).await?;
    }
    service::Entity::delete_many().exec(&txn).await?;
    testimonials::delete_all_testimonials(&txn).await?;
    company_info::delete_company_info(&txn).await?;
    txn.commit().await?;
    info!(projects = ids.len(), "existing content cleared");
    Ok(())
}

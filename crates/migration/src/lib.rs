//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_company_info;
mod m20240601_000002_create_service;
mod m20240601_000003_create_project;
mod m20240601_000004_create_project_image;
mod m20240601_000005_create_testimonial;
mod m20240601_000006_create_gallery_image;
mod m20240601_000007_create_contact_message;
mod m20240601_000008_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_company_info::Migration),
            Box::new(m20240601_000002_create_service::Migration),
            Box::new(m20240601_000003_create_project::Migration),
            Box::new(m20240601_000004_create_project_image::Migration),
            Box::new(m20240601_000005_create_testimonial::Migration),
            Box::new(m20240601_000006_create_gallery_image::Migration),
            Box::new(m20240601_000007_create_contact_message::Migration),
            // Indexes should always be applied last
            Box::new(m20240601_000008_add_indexes::Migration),
        ]
    }
}

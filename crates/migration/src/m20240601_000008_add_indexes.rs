use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Project: lookups by service
        manager
            .create_index(
                Index::create()
                    .name("idx_project_service")
                    .table(Project::Table)
                    .col(Project::ServiceId)
                    .to_owned(),
            )
            .await?;

        // Project: listing filter (is_active, is_featured)
        manager
            .create_index(
                Index::create()
                    .name("idx_project_active_featured")
                    .table(Project::Table)
                    .col(Project::IsActive)
                    .col(Project::IsFeatured)
                    .to_owned(),
            )
            .await?;

        // ProjectImage: index on project_id
        manager
            .create_index(
                Index::create()
                    .name("idx_project_image_project")
                    .table(ProjectImage::Table)
                    .col(ProjectImage::ProjectId)
                    .to_owned(),
            )
            .await?;

        // Testimonial / GalleryImage: nullable project references
        manager
            .create_index(
                Index::create()
                    .name("idx_testimonial_project")
                    .table(Testimonial::Table)
                    .col(Testimonial::ProjectId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_gallery_image_project")
                    .table(GalleryImage::Table)
                    .col(GalleryImage::LinkedProjectId)
                    .to_owned(),
            )
            .await?;

        // ContactMessage: newest-first listing
        manager
            .create_index(
                Index::create()
                    .name("idx_contact_message_created")
                    .table(ContactMessage::Table)
                    .col(ContactMessage::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_project_service").table(Project::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_project_active_featured").table(Project::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_project_image_project").table(ProjectImage::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_testimonial_project").table(Testimonial::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_gallery_image_project").table(GalleryImage::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_contact_message_created").table(ContactMessage::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Project { Table, ServiceId, IsActive, IsFeatured }

#[derive(DeriveIden)]
enum ProjectImage { Table, ProjectId }

#[derive(DeriveIden)]
enum Testimonial { Table, ProjectId }

#[derive(DeriveIden)]
enum GalleryImage { Table, LinkedProjectId }

#[derive(DeriveIden)]
enum ContactMessage { Table, CreatedAt }

//! Create `project` table with nullable FK to `service`.
//!
//! Deleting a service keeps its projects; the reference is cleared.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Project::Table)
                    .if_not_exists()
                    .col(pk_auto(Project::Id))
                    .col(string_len(Project::Title, 200).not_null())
                    .col(string_len(Project::Slug, 220).unique_key().not_null())
                    .col(text(Project::Description).not_null())
                    .col(string_len(Project::ShortDescription, 300).not_null().default(""))
                    .col(string_len(Project::Location, 200).not_null().default(""))
                    .col(date_null(Project::CompletionDate))
                    .col(string_len(Project::Duration, 100).not_null().default(""))
                    .col(string_len(Project::Surface, 100).not_null().default(""))
                    .col(integer_null(Project::ServiceId))
                    .col(string_len(Project::FeaturedImage, 500).not_null().default(""))
                    .col(string_len_null(Project::BeforeImage, 500))
                    .col(boolean(Project::HasBeforeAfter).not_null().default(false))
                    .col(boolean(Project::IsFeatured).not_null().default(false))
                    .col(boolean(Project::IsActive).not_null().default(true))
                    .col(integer(Project::Order).not_null().default(0))
                    .col(timestamp_with_time_zone(Project::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Project::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_service")
                            .from(Project::Table, Project::ServiceId)
                            .to(Service::Table, Service::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Project::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Project {
    Table,
    Id,
    Title,
    Slug,
    Description,
    ShortDescription,
    Location,
    CompletionDate,
    Duration,
    Surface,
    ServiceId,
    FeaturedImage,
    BeforeImage,
    HasBeforeAfter,
    IsFeatured,
    IsActive,
    Order,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Service { Table, Id }

//! Create `gallery_image` table (sitewide gallery, optionally linked to a project).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GalleryImage::Table)
                    .if_not_exists()
                    .col(pk_auto(GalleryImage::Id))
                    .col(string_len(GalleryImage::Title, 200).not_null())
                    .col(string_len(GalleryImage::Image, 500).not_null())
                    .col(string_len(GalleryImage::Category, 50).not_null().default(""))
                    .col(string_len(GalleryImage::Caption, 300).not_null().default(""))
                    .col(integer_null(GalleryImage::LinkedProjectId))
                    .col(boolean(GalleryImage::IsActive).not_null().default(true))
                    .col(integer(GalleryImage::Order).not_null().default(0))
                    .col(timestamp_with_time_zone(GalleryImage::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(GalleryImage::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_gallery_image_project")
                            .from(GalleryImage::Table, GalleryImage::LinkedProjectId)
                            .to(Project::Table, Project::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(GalleryImage::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum GalleryImage {
    Table,
    Id,
    Title,
    Image,
    Category,
    Caption,
    LinkedProjectId,
    IsActive,
    Order,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Project { Table, Id }

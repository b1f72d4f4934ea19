//! Create `project_image` table; rows are owned by their project (cascade delete).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProjectImage::Table)
                    .if_not_exists()
                    .col(pk_auto(ProjectImage::Id))
                    .col(integer(ProjectImage::ProjectId).not_null())
                    .col(string_len(ProjectImage::Image, 500).not_null())
                    .col(string_len(ProjectImage::Caption, 200).not_null().default(""))
                    .col(boolean(ProjectImage::IsVisible).not_null().default(true))
                    .col(integer(ProjectImage::Order).not_null().default(0))
                    .col(timestamp_with_time_zone(ProjectImage::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_image_project")
                            .from(ProjectImage::Table, ProjectImage::ProjectId)
                            .to(Project::Table, Project::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ProjectImage::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ProjectImage { Table, Id, ProjectId, Image, Caption, IsVisible, Order, CreatedAt }

#[derive(DeriveIden)]
enum Project { Table, Id }

//! Create `testimonial` table with rating check (1..=5) and nullable FK to `project`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Testimonial::Table)
                    .if_not_exists()
                    .col(pk_auto(Testimonial::Id))
                    .col(string_len(Testimonial::ClientName, 200).not_null())
                    .col(string_len(Testimonial::ClientLocation, 200).not_null().default(""))
                    .col(text(Testimonial::Content).not_null())
                    .col(
                        integer(Testimonial::Rating)
                            .not_null()
                            .default(5)
                            .check(Expr::col(Testimonial::Rating).between(1, 5)),
                    )
                    .col(integer_null(Testimonial::ProjectId))
                    .col(boolean(Testimonial::IsActive).not_null().default(true))
                    .col(integer(Testimonial::Order).not_null().default(0))
                    .col(timestamp_with_time_zone(Testimonial::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Testimonial::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_testimonial_project")
                            .from(Testimonial::Table, Testimonial::ProjectId)
                            .to(Project::Table, Project::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Testimonial::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Testimonial {
    Table,
    Id,
    ClientName,
    ClientLocation,
    Content,
    Rating,
    ProjectId,
    IsActive,
    Order,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Project { Table, Id }

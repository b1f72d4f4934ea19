//! Create `service` table (services catalog).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Service::Table)
                    .if_not_exists()
                    .col(pk_auto(Service::Id))
                    .col(string_len(Service::Title, 200).not_null())
                    .col(string_len(Service::Slug, 220).unique_key().not_null())
                    .col(text(Service::Description).not_null())
                    .col(string_len(Service::ShortDescription, 300).not_null().default(""))
                    .col(string_len(Service::Icon, 50).not_null().default("HomeRepairService"))
                    .col(string_len(Service::Image, 500).not_null().default(""))
                    .col(integer(Service::Order).not_null().default(0))
                    .col(boolean(Service::IsActive).not_null().default(true))
                    .col(timestamp_with_time_zone(Service::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Service::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Service::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Service {
    Table,
    Id,
    Title,
    Slug,
    Description,
    ShortDescription,
    Icon,
    Image,
    Order,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

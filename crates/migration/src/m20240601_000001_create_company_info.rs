//! Create `company_info` table.
//!
//! Holds at most one row; the single-row rule is enforced by the store, not by a constraint.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CompanyInfo::Table)
                    .if_not_exists()
                    .col(pk_auto(CompanyInfo::Id))
                    .col(string_len(CompanyInfo::CompanyName, 200).not_null())
                    .col(string_len(CompanyInfo::Tagline, 300).not_null().default(""))
                    .col(text(CompanyInfo::Description).not_null())
                    .col(string_len(CompanyInfo::Phone, 20).not_null())
                    .col(string_len(CompanyInfo::Email, 254).not_null())
                    .col(text(CompanyInfo::Address).not_null())
                    .col(string_len(CompanyInfo::FacebookUrl, 200).not_null().default(""))
                    .col(string_len(CompanyInfo::InstagramUrl, 200).not_null().default(""))
                    .col(string_len(CompanyInfo::LinkedinUrl, 200).not_null().default(""))
                    .col(string_len(CompanyInfo::MetaDescription, 160).not_null().default(""))
                    .col(string_len(CompanyInfo::MetaKeywords, 255).not_null().default(""))
                    .col(timestamp_with_time_zone(CompanyInfo::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(CompanyInfo::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(CompanyInfo::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum CompanyInfo {
    Table,
    Id,
    CompanyName,
    Tagline,
    Description,
    Phone,
    Email,
    Address,
    FacebookUrl,
    InstagramUrl,
    LinkedinUrl,
    MetaDescription,
    MetaKeywords,
    CreatedAt,
    UpdatedAt,
}

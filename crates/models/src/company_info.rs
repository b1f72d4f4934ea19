use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors;

/// Company profile. At most one row exists; see `service::company_info`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "company_info")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub company_name: String,
    pub tagline: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub phone: String,
    pub email: String,
    #[sea_orm(column_type = "Text")]
    pub address: String,
    pub facebook_url: String,
    pub instagram_url: String,
    pub linkedin_url: String,
    pub meta_description: String,
    pub meta_keywords: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { panic!("no relations defined here") }
}

impl ActiveModelBehavior for ActiveModel {}

/// SEO meta description is capped at 160 characters.
pub fn validate_meta_description(s: &str) -> Result<(), errors::ModelError> {
    if s.chars().count() > 160 {
        return Err(errors::ModelError::Validation("meta_description must be at most 160 characters".into()));
    }
    Ok(())
}

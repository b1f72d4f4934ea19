use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::project;

/// A service offered in the catalog. `order` then `title` is the display order.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub short_description: String,
    pub icon: String,
    pub image: String,
    pub order: i32,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Projects }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Projects => Entity::has_many(project::Entity).into(),
        }
    }
}

impl Related<project::Entity> for Entity {
    fn to() -> RelationDef { Relation::Projects.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub const DEFAULT_ICON: &str = "HomeRepairService";

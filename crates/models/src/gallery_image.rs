use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::project;

/// Category tag of images promoted to the homepage hero carousel.
pub const HERO_CATEGORY: &str = "hero";

/// Sitewide gallery image; `linked_project_id` makes it clickable.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "gallery_image")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub image: String,
    pub category: String,
    pub caption: String,
    pub linked_project_id: Option<i32>,
    pub is_active: bool,
    pub order: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { LinkedProject }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::LinkedProject => Entity::belongs_to(project::Entity)
                .from(Column::LinkedProjectId)
                .to(project::Column::Id)
                .into(),
        }
    }
}

impl Related<project::Entity> for Entity {
    fn to() -> RelationDef { Relation::LinkedProject.def() }
}

impl ActiveModelBehavior for ActiveModel {}

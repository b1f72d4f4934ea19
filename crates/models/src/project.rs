use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{gallery_image, project_image, service, testimonial};

/// Portfolio project.
///
/// Default order: featured first, then `order`, then most recent `completion_date`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "project")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub short_description: String,
    pub location: String,
    pub completion_date: Option<Date>,
    pub duration: String,
    pub surface: String,
    pub service_id: Option<i32>,
    pub featured_image: String,
    pub before_image: Option<String>,
    pub has_before_after: bool,
    pub is_featured: bool,
    pub is_active: bool,
    pub order: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Service,
    Images,
    Testimonials,
    GalleryImages,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Service => Entity::belongs_to(service::Entity)
                .from(Column::ServiceId)
                .to(service::Column::Id)
                .into(),
            Relation::Images => Entity::has_many(project_image::Entity).into(),
            Relation::Testimonials => Entity::has_many(testimonial::Entity).into(),
            Relation::GalleryImages => Entity::has_many(gallery_image::Entity).into(),
        }
    }
}

impl Related<service::Entity> for Entity {
    fn to() -> RelationDef { Relation::Service.def() }
}

impl Related<project_image::Entity> for Entity {
    fn to() -> RelationDef { Relation::Images.def() }
}

impl Related<testimonial::Entity> for Entity {
    fn to() -> RelationDef { Relation::Testimonials.def() }
}

impl Related<gallery_image::Entity> for Entity {
    fn to() -> RelationDef { Relation::GalleryImages.def() }
}

impl ActiveModelBehavior for ActiveModel {}

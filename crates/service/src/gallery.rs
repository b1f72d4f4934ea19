use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder, Set};
use serde::Deserialize;

use models::{gallery_image, project};

use crate::errors::{required, ServiceError};

#[derive(Debug, Clone, Deserialize)]
pub struct NewGalleryImage {
    pub title: String,
    pub image: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub linked_project_id: Option<i32>,
    #[serde(default = "crate::default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub order: i32,
}

impl Default for NewGalleryImage {
    fn default() -> Self {
        Self {
            title: String::new(),
            image: String::new(),
            category: String::new(),
            caption: String::new(),
            linked_project_id: None,
            is_active: true,
            order: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GalleryFilter {
    pub active_only: bool,
    pub category: Option<String>,
}

impl GalleryFilter {
    pub fn public() -> Self { Self { active_only: true, category: None } }

    pub fn hero() -> Self { Self { active_only: true, category: Some(gallery_image::HERO_CATEGORY.to_string()) } }
}

pub async fn create_gallery_image<C: ConnectionTrait>(
    db: &C,
    input: NewGalleryImage,
) -> Result<gallery_image::Model, ServiceError> {
    let title = required("title", &input.title)?;
    let image = required("image", &input.image)?;
    if let Some(pid) = input.linked_project_id {
        if project::Entity::find_by_id(pid).one(db).await?.is_none() {
            return Err(ServiceError::Validation(format!("project {pid} does not exist")));
        }
    }
    let now = Utc::now().into();
    let am = gallery_image::ActiveModel {
        id: NotSet,
        title: Set(title),
        image: Set(image),
        category: Set(input.category.trim().to_string()),
        caption: Set(input.caption),
        linked_project_id: Set(input.linked_project_id),
        is_active: Set(input.is_active),
        order: Set(input.order),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

/// By `order` then creation time, each with its linked project.
pub async fn list_gallery<C: ConnectionTrait>(
    db: &C,
    filter: &GalleryFilter,
) -> Result<Vec<(gallery_image::Model, Option<project::Model>)>, ServiceError> {
    let mut q = gallery_image::Entity::find();
    if filter.active_only {
        q = q.filter(gallery_image::Column::IsActive.eq(true));
    }
    if let Some(cat) = filter.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        q = q.filter(gallery_image::Column::Category.eq(cat));
    }
    let rows = q
        .order_by_asc(gallery_image::Column::Order)
        .order_by_asc(gallery_image::Column::CreatedAt)
        .order_by_asc(gallery_image::Column::Id)
        .find_also_related(project::Entity)
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn set_gallery_image_active<C: ConnectionTrait>(
    db: &C,
    id: i32,
    active: bool,
) -> Result<gallery_image::Model, ServiceError> {
    let Some(existing) = gallery_image::Entity::find_by_id(id).one(db).await? else {
        return Err(ServiceError::not_found("gallery image"));
    };
    let mut am: gallery_image::ActiveModel = existing.into();
    am.is_active = Set(active);
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

pub async fn delete_gallery_image<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, ServiceError> {
    Ok(gallery_image::Entity::delete_by_id(id).exec(db).await?.rows_affected > 0)
}

/// Drop every gallery row; the importer rebuilds the collection from scratch.
pub async fn clear_gallery<C: ConnectionTrait>(db: &C) -> Result<u64, ServiceError> {
    Ok(gallery_image::Entity::delete_many().exec(db).await?.rows_affected)
}

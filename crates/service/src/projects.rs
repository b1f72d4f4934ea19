//! Portfolio projects and their image galleries.

use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, NotSet, QueryFilter, QueryOrder, Select,
    Set, TransactionTrait,
};
use serde::Deserialize;
use tracing::{debug, info};

use models::{gallery_image, project, project_image, service, testimonial};

use crate::errors::{required, required_max, ServiceError};
use crate::slugs::{resolve_slug, TITLE_MAX};

#[derive(Debug, Clone, Deserialize)]
pub struct NewProject {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub completion_date: Option<NaiveDate>,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub surface: String,
    #[serde(default)]
    pub service_id: Option<i32>,
    #[serde(default)]
    pub featured_image: String,
    #[serde(default)]
    pub before_image: Option<String>,
    #[serde(default)]
    pub has_before_after: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "crate::default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub order: i32,
}

impl Default for NewProject {
    fn default() -> Self {
        Self {
            title: String::new(),
            slug: None,
            description: String::new(),
            short_description: String::new(),
            location: String::new(),
            completion_date: None,
            duration: String::new(),
            surface: String::new(),
            service_id: None,
            featured_image: String::new(),
            before_image: None,
            has_before_after: false,
            is_featured: false,
            is_active: true,
            order: 0,
        }
    }
}

/// Partial update. Nullable columns use `Option<Option<_>>`: `Some(None)` clears.
#[derive(Debug, Clone, Default)]
pub struct ProjectChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub location: Option<String>,
    pub completion_date: Option<Option<NaiveDate>>,
    pub duration: Option<String>,
    pub surface: Option<String>,
    pub service_id: Option<Option<i32>>,
    pub featured_image: Option<String>,
    pub before_image: Option<Option<String>>,
    pub has_before_after: Option<bool>,
    pub is_featured: Option<bool>,
    pub is_active: Option<bool>,
    pub order: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub active: Option<bool>,
    pub featured: Option<bool>,
    pub service_id: Option<i32>,
}

impl ProjectFilter {
    /// What the public site sees.
    pub fn public() -> Self { Self { active: Some(true), ..Self::default() } }

    pub fn featured(mut self) -> Self {
        self.featured = Some(true);
        self
    }

    fn apply(&self, mut q: Select<project::Entity>) -> Select<project::Entity> {
        if let Some(a) = self.active { q = q.filter(project::Column::IsActive.eq(a)); }
        if let Some(f) = self.featured { q = q.filter(project::Column::IsFeatured.eq(f)); }
        if let Some(s) = self.service_id { q = q.filter(project::Column::ServiceId.eq(s)); }
        q
    }
}

/// Project with its service and visible gallery, as shown on a detail page.
#[derive(Debug, Clone)]
pub struct ProjectDetail {
    pub project: project::Model,
    pub service: Option<service::Model>,
    pub images: Vec<project_image::Model>,
}

/// Featured first, then `order`, then most recent completion.
fn default_order(q: Select<project::Entity>) -> Select<project::Entity> {
    q.order_by_desc(project::Column::IsFeatured)
        .order_by_asc(project::Column::Order)
        .order_by_desc(project::Column::CompletionDate)
        .order_by_asc(project::Column::Id)
}

pub async fn create_project<C: ConnectionTrait>(db: &C, input: NewProject) -> Result<project::Model, ServiceError> {
    let title = required_max("title", &input.title, TITLE_MAX)?;
    let slug = resolve_slug(&title, input.slug.as_deref())?;
    if find_by_slug(db, &slug).await?.is_some() {
        return Err(ServiceError::Conflict(format!("project slug '{slug}' already exists")));
    }
    if let Some(sid) = input.service_id {
        ensure_service_exists(db, sid).await?;
    }

    let now = Utc::now().into();
    let am = project::ActiveModel {
        id: NotSet,
        title: Set(title),
        slug: Set(slug),
        description: Set(input.description),
        short_description: Set(input.short_description),
        location: Set(input.location),
        completion_date: Set(input.completion_date),
        duration: Set(input.duration),
        surface: Set(input.surface),
        service_id: Set(input.service_id),
        featured_image: Set(input.featured_image),
        before_image: Set(input.before_image),
        has_before_after: Set(input.has_before_after),
        is_featured: Set(input.is_featured),
        is_active: Set(input.is_active),
        order: Set(input.order),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let created = am.insert(db).await?;
    info!(id = created.id, slug = %created.slug, "project created");
    Ok(created)
}

pub async fn get_project<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<project::Model>, ServiceError> {
    Ok(project::Entity::find_by_id(id).one(db).await?)
}

pub async fn get_project_by_slug<C: ConnectionTrait>(
    db: &C,
    slug: &str,
    active_only: bool,
) -> Result<Option<project::Model>, ServiceError> {
    let mut q = project::Entity::find().filter(project::Column::Slug.eq(slug));
    if active_only {
        q = q.filter(project::Column::IsActive.eq(true));
    }
    Ok(q.one(db).await?)
}

/// Projects matching `filter` in default order, each with its service.
pub async fn list_projects<C: ConnectionTrait>(
    db: &C,
    filter: &ProjectFilter,
) -> Result<Vec<(project::Model, Option<service::Model>)>, ServiceError> {
    let q = default_order(filter.apply(project::Entity::find()));
    Ok(q.find_also_related(service::Entity).all(db).await?)
}

/// Active project by slug with its service and visible images.
pub async fn get_project_detail<C: ConnectionTrait>(db: &C, slug: &str) -> Result<Option<ProjectDetail>, ServiceError> {
    let Some(project) = get_project_by_slug(db, slug, true).await? else {
        return Ok(None);
    };
    let service = project.find_related(service::Entity).one(db).await?;
    let images = list_project_images(db, project.id, true).await?;
    Ok(Some(ProjectDetail { project, service, images }))
}

pub async fn update_project<C: ConnectionTrait>(
    db: &C,
    id: i32,
    changes: ProjectChanges,
) -> Result<project::Model, ServiceError> {
    let Some(existing) = get_project(db, id).await? else {
        return Err(ServiceError::not_found("project"));
    };
    let mut am: project::ActiveModel = existing.into();
    if let Some(t) = changes.title { am.title = Set(required_max("title", &t, TITLE_MAX)?); }
    if let Some(v) = changes.description { am.description = Set(v); }
    if let Some(v) = changes.short_description { am.short_description = Set(v); }
    if let Some(v) = changes.location { am.location = Set(v); }
    if let Some(v) = changes.completion_date { am.completion_date = Set(v); }
    if let Some(v) = changes.duration { am.duration = Set(v); }
    if let Some(v) = changes.surface { am.surface = Set(v); }
    if let Some(v) = changes.service_id {
        if let Some(sid) = v {
            ensure_service_exists(db, sid).await?;
        }
        am.service_id = Set(v);
    }
    if let Some(v) = changes.featured_image { am.featured_image = Set(v); }
    if let Some(v) = changes.before_image { am.before_image = Set(v); }
    if let Some(v) = changes.has_before_after { am.has_before_after = Set(v); }
    if let Some(v) = changes.is_featured { am.is_featured = Set(v); }
    if let Some(v) = changes.is_active { am.is_active = Set(v); }
    if let Some(v) = changes.order { am.order = Set(v); }
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

/// Delete a project and its images; testimonials and gallery images keep
/// existing with the link cleared.
pub async fn delete_project<C: TransactionTrait>(db: &C, id: i32) -> Result<bool, ServiceError> {
    let txn = db.begin().await?;
    let deleted = purge_project(&txn, id).await?;
    txn.commit().await?;
    if deleted {
        info!(id, "project deleted");
    }
    Ok(deleted)
}

/// Cascade body of [`delete_project`], run on a caller-owned connection or transaction.
pub(crate) async fn purge_project<C: ConnectionTrait>(conn: &C, id: i32) -> Result<bool, ServiceError> {
    let images = project_image::Entity::delete_many()
        .filter(project_image::Column::ProjectId.eq(id))
        .exec(conn)
        .await?;
    testimonial::Entity::update_many()
        .col_expr(testimonial::Column::ProjectId, Expr::value(Option::<i32>::None))
        .filter(testimonial::Column::ProjectId.eq(id))
        .exec(conn)
        .await?;
    gallery_image::Entity::update_many()
        .col_expr(gallery_image::Column::LinkedProjectId, Expr::value(Option::<i32>::None))
        .filter(gallery_image::Column::LinkedProjectId.eq(id))
        .exec(conn)
        .await?;
    let res = project::Entity::delete_by_id(id).exec(conn).await?;
    debug!(id, images = images.rows_affected, "project purged");
    Ok(res.rows_affected > 0)
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewProjectImage {
    pub image: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default = "crate::default_true")]
    pub is_visible: bool,
    #[serde(default)]
    pub order: i32,
}

impl NewProjectImage {
    pub fn new(image: impl Into<String>, order: i32) -> Self {
        Self { image: image.into(), caption: String::new(), is_visible: true, order }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProjectImageChanges {
    pub caption: Option<String>,
    pub is_visible: Option<bool>,
    pub order: Option<i32>,
}

pub async fn add_project_image<C: ConnectionTrait>(
    db: &C,
    project_id: i32,
    input: NewProjectImage,
) -> Result<project_image::Model, ServiceError> {
    let image = required("image", &input.image)?;
    if get_project(db, project_id).await?.is_none() {
        return Err(ServiceError::not_found("project"));
    }
    let am = project_image::ActiveModel {
        id: NotSet,
        project_id: Set(project_id),
        image: Set(image),
        caption: Set(input.caption),
        is_visible: Set(input.is_visible),
        order: Set(input.order),
        created_at: Set(Utc::now().into()),
    };
    Ok(am.insert(db).await?)
}

/// Images of one project by `order`, ties by creation time.
pub async fn list_project_images<C: ConnectionTrait>(
    db: &C,
    project_id: i32,
    visible_only: bool,
) -> Result<Vec<project_image::Model>, ServiceError> {
    let mut q = project_image::Entity::find().filter(project_image::Column::ProjectId.eq(project_id));
    if visible_only {
        q = q.filter(project_image::Column::IsVisible.eq(true));
    }
    let rows = q
        .order_by_asc(project_image::Column::Order)
        .order_by_asc(project_image::Column::CreatedAt)
        .order_by_asc(project_image::Column::Id)
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn update_project_image<C: ConnectionTrait>(
    db: &C,
    id: i32,
    changes: ProjectImageChanges,
) -> Result<project_image::Model, ServiceError> {
    let Some(existing) = project_image::Entity::find_by_id(id).one(db).await? else {
        return Err(ServiceError::not_found("project image"));
    };
    let mut am: project_image::ActiveModel = existing.into();
    if let Some(v) = changes.caption { am.caption = Set(v); }
    if let Some(v) = changes.is_visible { am.is_visible = Set(v); }
    if let Some(v) = changes.order { am.order = Set(v); }
    Ok(am.update(db).await?)
}

pub async fn delete_project_image<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, ServiceError> {
    let res = project_image::Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

async fn find_by_slug<C: ConnectionTrait>(db: &C, slug: &str) -> Result<Option<project::Model>, ServiceError> {
    Ok(project::Entity::find().filter(project::Column::Slug.eq(slug)).one(db).await?)
}

async fn ensure_service_exists<C: ConnectionTrait>(db: &C, id: i32) -> Result<(), ServiceError> {
    if service::Entity::find_by_id(id).one(db).await?.is_none() {
        return Err(ServiceError::Validation(format!("service {id} does not exist")));
    }
    Ok(())
}

//! JSON representations served by the public API.
//!
//! Media references are resolved to absolute URLs here; list and detail
//! representations of projects differ on purpose.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Serialize;
use utoipa::ToSchema;

use ::service::media::resolve_media_url;
use ::service::projects::ProjectDetail;
use models::{company_info, gallery_image, project, project_image, service, testimonial};

#[derive(Debug, Serialize, ToSchema)]
pub struct CompanyInfoDto {
    pub id: i32,
    pub company_name: String,
    pub tagline: String,
    pub description: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub facebook_url: String,
    pub instagram_url: String,
    pub linkedin_url: String,
    pub meta_description: String,
    pub meta_keywords: String,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<company_info::Model> for CompanyInfoDto {
    fn from(m: company_info::Model) -> Self {
        Self {
            id: m.id,
            company_name: m.company_name,
            tagline: m.tagline,
            description: m.description,
            phone: m.phone,
            email: m.email,
            address: m.address,
            facebook_url: m.facebook_url,
            instagram_url: m.instagram_url,
            linkedin_url: m.linkedin_url,
            meta_description: m.meta_description,
            meta_keywords: m.meta_keywords,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceDto {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub short_description: String,
    pub icon: String,
    pub image: Option<String>,
    pub order: i32,
    pub is_active: bool,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl ServiceDto {
    pub fn new(m: service::Model, base_url: &str) -> Self {
        Self {
            image: resolve_media_url(base_url, &m.image),
            id: m.id,
            title: m.title,
            slug: m.slug,
            description: m.description,
            short_description: m.short_description,
            icon: m.icon,
            order: m.order,
            is_active: m.is_active,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Lightweight card used by the project list and the featured list.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectListItem {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub short_description: String,
    pub location: String,
    pub featured_image: Option<String>,
    /// Same absolute URL as `featured_image`.
    pub featured_image_url: Option<String>,
    pub is_featured: bool,
    pub service_name: Option<String>,
    pub completion_date: Option<NaiveDate>,
}

impl ProjectListItem {
    pub fn new(p: project::Model, svc: Option<service::Model>, base_url: &str) -> Self {
        let featured_image = resolve_media_url(base_url, &p.featured_image);
        Self {
            featured_image_url: featured_image.clone(),
            featured_image,
            id: p.id,
            title: p.title,
            slug: p.slug,
            short_description: p.short_description,
            location: p.location,
            is_featured: p.is_featured,
            service_name: svc.map(|s| s.title),
            completion_date: p.completion_date,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectImageDto {
    pub id: i32,
    pub image: Option<String>,
    pub image_url: Option<String>,
    pub caption: String,
    pub order: i32,
}

impl ProjectImageDto {
    pub fn new(m: project_image::Model, base_url: &str) -> Self {
        let image = resolve_media_url(base_url, &m.image);
        Self { image_url: image.clone(), image, id: m.id, caption: m.caption, order: m.order }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectDetailDto {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub short_description: String,
    pub location: String,
    pub completion_date: Option<NaiveDate>,
    pub duration: String,
    pub surface: String,
    /// Service id.
    pub service: Option<i32>,
    pub service_name: Option<String>,
    pub featured_image: Option<String>,
    pub featured_image_url: Option<String>,
    pub before_image: Option<String>,
    pub before_image_url: Option<String>,
    pub has_before_after: bool,
    pub is_featured: bool,
    pub is_active: bool,
    pub order: i32,
    pub images: Vec<ProjectImageDto>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl ProjectDetailDto {
    pub fn new(detail: ProjectDetail, base_url: &str) -> Self {
        let p = detail.project;
        let featured_image = resolve_media_url(base_url, &p.featured_image);
        let before_image = p.before_image.as_deref().and_then(|b| resolve_media_url(base_url, b));
        Self {
            featured_image_url: featured_image.clone(),
            featured_image,
            before_image_url: before_image.clone(),
            before_image,
            id: p.id,
            title: p.title,
            slug: p.slug,
            description: p.description,
            short_description: p.short_description,
            location: p.location,
            completion_date: p.completion_date,
            duration: p.duration,
            surface: p.surface,
            service: p.service_id,
            service_name: detail.service.map(|s| s.title),
            has_before_after: p.has_before_after,
            is_featured: p.is_featured,
            is_active: p.is_active,
            order: p.order,
            images: detail.images.into_iter().map(|i| ProjectImageDto::new(i, base_url)).collect(),
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TestimonialDto {
    pub id: i32,
    pub client_name: String,
    pub client_location: String,
    pub content: String,
    pub rating: i32,
    /// Project id.
    pub project: Option<i32>,
    pub project_title: Option<String>,
    pub is_active: bool,
    pub order: i32,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<(testimonial::Model, Option<project::Model>)> for TestimonialDto {
    fn from((t, p): (testimonial::Model, Option<project::Model>)) -> Self {
        Self {
            id: t.id,
            client_name: t.client_name,
            client_location: t.client_location,
            content: t.content,
            rating: t.rating,
            project: t.project_id,
            project_title: p.map(|p| p.title),
            is_active: t.is_active,
            order: t.order,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GalleryImageDto {
    pub id: i32,
    pub title: String,
    pub image: Option<String>,
    pub category: String,
    pub caption: String,
    /// Linked project id.
    pub linked_project: Option<i32>,
    pub linked_project_slug: Option<String>,
    pub order: i32,
}

impl GalleryImageDto {
    pub fn new(g: gallery_image::Model, p: Option<project::Model>, base_url: &str) -> Self {
        Self {
            image: resolve_media_url(base_url, &g.image),
            id: g.id,
            title: g.title,
            category: g.category,
            caption: g.caption,
            linked_project: g.linked_project_id,
            linked_project_slug: p.map(|p| p.slug),
            order: g.order,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ContactAccepted {
    pub message: String,
}

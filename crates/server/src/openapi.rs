use utoipa::OpenApi;
use utoipa::ToSchema;

use crate::dto::{
    CompanyInfoDto, ContactAccepted, GalleryImageDto, ProjectDetailDto, ProjectImageDto, ProjectListItem,
    ServiceDto, TestimonialDto,
};

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct ContactRequestDoc {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
}

/// `fields` maps a field name to its messages.
#[derive(ToSchema)]
pub struct ErrorBody {
    pub error: String,
    pub message: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub fields: Option<serde_json::Value>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::content::get_company_info,
        crate::routes::content::list_services,
        crate::routes::content::get_service,
        crate::routes::projects::list_projects,
        crate::routes::projects::list_featured,
        crate::routes::projects::get_project,
        crate::routes::showcase::list_testimonials,
        crate::routes::showcase::list_gallery,
        crate::routes::showcase::list_hero,
        crate::routes::contact::submit_contact,
    ),
    components(
        schemas(
            HealthResponse,
            ContactRequestDoc,
            ErrorBody,
            CompanyInfoDto,
            ServiceDto,
            ProjectListItem,
            ProjectImageDto,
            ProjectDetailDto,
            TestimonialDto,
            GalleryImageDto,
            ContactAccepted,
        )
    ),
    tags(
        (name = "health"),
        (name = "content"),
        (name = "projects"),
        (name = "showcase"),
        (name = "contact")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_public_paths() {
        let doc = ApiDoc::openapi();
        for path in ["/health", "/api/projects/", "/api/projects/{slug}/", "/api/contact/", "/api/gallery/hero/"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}

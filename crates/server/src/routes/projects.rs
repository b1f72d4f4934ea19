use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use utoipa::IntoParams;

use service::catalog;
use service::projects::{self, ProjectFilter};

use crate::dto::{ProjectDetailDto, ProjectListItem};
use crate::errors::JsonApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProjectListQuery {
    /// Only projects of the service with this slug.
    pub service: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/projects/",
    tag = "projects",
    params(ProjectListQuery),
    responses((status = 200, description = "Active projects, featured first", body = [ProjectListItem]))
)]
pub async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<ProjectListQuery>,
) -> Result<Json<Vec<ProjectListItem>>, JsonApiError> {
    let mut filter = ProjectFilter::public();
    if let Some(slug) = query.service.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        match catalog::get_service_by_slug(&state.db, slug, false).await? {
            Some(svc) => filter.service_id = Some(svc.id),
            // 未知 slug 返回空列表
            None => return Ok(Json(Vec::new())),
        }
    }
    list(&state, &filter).await
}

#[utoipa::path(
    get,
    path = "/api/projects/featured/",
    tag = "projects",
    responses((status = 200, description = "Active featured projects", body = [ProjectListItem]))
)]
pub async fn list_featured(State(state): State<AppState>) -> Result<Json<Vec<ProjectListItem>>, JsonApiError> {
    list(&state, &ProjectFilter::public().featured()).await
}

async fn list(state: &AppState, filter: &ProjectFilter) -> Result<Json<Vec<ProjectListItem>>, JsonApiError> {
    let rows = projects::list_projects(&state.db, filter).await?;
    Ok(Json(
        rows.into_iter()
            .map(|(p, svc)| ProjectListItem::new(p, svc, &state.media_base_url))
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/projects/{slug}/",
    tag = "projects",
    params(("slug" = String, Path, description = "Project slug")),
    responses(
        (status = 200, description = "Project with its visible images", body = ProjectDetailDto),
        (status = 404, description = "Unknown or inactive", body = crate::openapi::ErrorBody)
    )
)]
pub async fn get_project(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProjectDetailDto>, JsonApiError> {
    let detail = projects::get_project_detail(&state.db, &slug)
        .await?
        .ok_or_else(|| JsonApiError::not_found("project"))?;
    Ok(Json(ProjectDetailDto::new(detail, &state.media_base_url)))
}

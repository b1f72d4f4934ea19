//! Company profile and service catalogue.

use axum::extract::{Path, State};
use axum::Json;

use service::{catalog, company_info};

use crate::dto::{CompanyInfoDto, ServiceDto};
use crate::errors::JsonApiError;
use crate::state::AppState;

/// The company profile, or 404 while none has been configured.
#[utoipa::path(
    get,
    path = "/api/company-info/",
    tag = "content",
    responses(
        (status = 200, description = "Company profile", body = CompanyInfoDto),
        (status = 404, description = "Not configured yet", body = crate::openapi::ErrorBody)
    )
)]
pub async fn get_company_info(State(state): State<AppState>) -> Result<Json<CompanyInfoDto>, JsonApiError> {
    let info = company_info::get_company_info(&state.db)
        .await?
        .ok_or_else(|| JsonApiError::not_found("company info"))?;
    Ok(Json(CompanyInfoDto::from(info)))
}

#[utoipa::path(
    get,
    path = "/api/services/",
    tag = "content",
    responses((status = 200, description = "Active services", body = [ServiceDto]))
)]
pub async fn list_services(State(state): State<AppState>) -> Result<Json<Vec<ServiceDto>>, JsonApiError> {
    let rows = catalog::list_services(&state.db, true).await?;
    Ok(Json(rows.into_iter().map(|s| ServiceDto::new(s, &state.media_base_url)).collect()))
}

#[utoipa::path(
    get,
    path = "/api/services/{slug}/",
    tag = "content",
    params(("slug" = String, Path, description = "Service slug")),
    responses(
        (status = 200, description = "Service", body = ServiceDto),
        (status = 404, description = "Unknown or inactive", body = crate::openapi::ErrorBody)
    )
)]
pub async fn get_service(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ServiceDto>, JsonApiError> {
    let svc = catalog::get_service_by_slug(&state.db, &slug, true)
        .await?
        .ok_or_else(|| JsonApiError::not_found("service"))?;
    Ok(Json(ServiceDto::new(svc, &state.media_base_url)))
}

use std::path::Path;

use axum::{routing::{get, post}, Json, Router};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::openapi::ApiDoc;
use crate::state::AppState;

pub mod contact;
pub mod content;
pub mod projects;
pub mod showcase;

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse))
)]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Public read API, the contact endpoint, stored media and the API document.
pub fn build_router(state: AppState, cors: CorsLayer, media_root: &Path) -> Router {
    let api = Router::new()
        .route("/company-info/", get(content::get_company_info))
        .route("/services/", get(content::list_services))
        .route("/services/:slug/", get(content::get_service))
        .route("/projects/", get(projects::list_projects))
        // 静态路径优先于 :slug
        .route("/projects/featured/", get(projects::list_featured))
        .route("/projects/:slug/", get(projects::get_project))
        .route("/testimonials/", get(showcase::list_testimonials))
        .route("/gallery/", get(showcase::list_gallery))
        .route("/gallery/hero/", get(showcase::list_hero))
        .route("/contact/", post(contact::submit_contact));

    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest("/api", api)
        .nest_service("/media", ServeDir::new(media_root))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // 响应返回时打点，包含状态码与耗时
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 失败（5xx 等）时以 ERROR 记录
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}

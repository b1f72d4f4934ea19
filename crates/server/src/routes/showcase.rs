//! Testimonials and the image gallery.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use utoipa::IntoParams;

use service::gallery::{self, GalleryFilter};
use service::testimonials;

use crate::dto::{GalleryImageDto, TestimonialDto};
use crate::errors::JsonApiError;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/testimonials/",
    tag = "showcase",
    responses((status = 200, description = "Active testimonials", body = [TestimonialDto]))
)]
pub async fn list_testimonials(State(state): State<AppState>) -> Result<Json<Vec<TestimonialDto>>, JsonApiError> {
    let rows = testimonials::list_testimonials(&state.db, true).await?;
    Ok(Json(rows.into_iter().map(TestimonialDto::from).collect()))
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GalleryQuery {
    /// Exact category, e.g. `hero`.
    pub category: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/gallery/",
    tag = "showcase",
    params(GalleryQuery),
    responses((status = 200, description = "Active gallery images", body = [GalleryImageDto]))
)]
pub async fn list_gallery(
    State(state): State<AppState>,
    Query(query): Query<GalleryQuery>,
) -> Result<Json<Vec<GalleryImageDto>>, JsonApiError> {
    let filter = GalleryFilter {
        category: query.category.filter(|c| !c.trim().is_empty()),
        ..GalleryFilter::public()
    };
    list(&state, &filter).await
}

#[utoipa::path(
    get,
    path = "/api/gallery/hero/",
    tag = "showcase",
    responses((status = 200, description = "Active hero images", body = [GalleryImageDto]))
)]
pub async fn list_hero(State(state): State<AppState>) -> Result<Json<Vec<GalleryImageDto>>, JsonApiError> {
    list(&state, &GalleryFilter::hero()).await
}

async fn list(state: &AppState, filter: &GalleryFilter) -> Result<Json<Vec<GalleryImageDto>>, JsonApiError> {
    let rows = gallery::list_gallery(&state.db, filter).await?;
    Ok(Json(
        rows.into_iter()
            .map(|(g, p)| GalleryImageDto::new(g, p, &state.media_base_url))
            .collect(),
    ))
}

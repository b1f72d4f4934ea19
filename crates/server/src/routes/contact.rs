use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use service::contact::{self, ContactSubmission, CONFIRMATION_MESSAGE};

use crate::dto::ContactAccepted;
use crate::errors::JsonApiError;
use crate::state::AppState;

/// Store a contact message and notify the owner in the background.
///
/// The notification outcome never changes the response.
#[utoipa::path(
    post,
    path = "/api/contact/",
    tag = "contact",
    request_body = crate::openapi::ContactRequestDoc,
    responses(
        (status = 201, description = "Message stored", body = ContactAccepted),
        (status = 400, description = "Field errors", body = crate::openapi::ErrorBody)
    )
)]
pub async fn submit_contact(
    State(state): State<AppState>,
    payload: Result<Json<ContactSubmission>, JsonRejection>,
) -> Result<(StatusCode, Json<ContactAccepted>), JsonApiError> {
    let Json(input) = payload?;
    let created = contact::submit_contact(&state.db, &state.notifier, input).await?;
    info!(id = created.id, "contact message received");
    Ok((StatusCode::CREATED, Json(ContactAccepted { message: CONFIRMATION_MESSAGE.to_string() })))
}

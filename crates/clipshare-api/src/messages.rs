use axum::{
    Json,
    body::Bytes,
    extract::{FromRequest, Request, State},
};
use serde::de::DeserializeOwned;
use tracing::debug;

use clipshare_types::api::{
    CreateMessageRequest, DeleteMessageRequest, SetPinnedRequest, SuccessResponse,
};
use clipshare_types::models::Message;

use crate::error::ApiError;
use crate::state::{AppState, run_blocking};

/// `Json` whose rejections come back as 400 `{error}` like every other
/// validation failure.
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// GET /api/messages
pub async fn list_messages(State(state): State<AppState>) -> Result<Json<Vec<Message>>, ApiError> {
    let messages = run_blocking(&state, |repo| repo.list()).await?;
    Ok(Json(messages))
}

/// POST /api/messages
pub async fn create_message(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateMessageRequest>,
) -> Result<Json<Message>, ApiError> {
    let content = req.content.unwrap_or_default();
    let message = run_blocking(&state, move |repo| repo.create(&content)).await?;
    Ok(Json(message))
}

/// PATCH /api/messages. Succeeds whether or not the id exists.
pub async fn set_pinned(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SetPinnedRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    run_blocking(&state, move |repo| repo.set_pinned(&req.id, req.is_pinned)).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// DELETE /api/messages. A body without `id` (or no body at all) deletes
/// every message.
pub async fn delete_messages(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SuccessResponse>, ApiError> {
    let req = parse_delete_body(&body)?;
    if req.id.is_none() {
        debug!("Delete request without id, clearing all messages");
    }
    run_blocking(&state, move |repo| repo.delete(req.id.as_deref())).await?;
    Ok(Json(SuccessResponse::ok()))
}

fn parse_delete_body(body: &[u8]) -> Result<DeleteMessageRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(DeleteMessageRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| ApiError::Validation(format!("Invalid request body: {e}")))
}

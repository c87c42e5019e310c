//! Resource listing and reservation handlers.
//!
//! Manager calls run on their own task so that a client disconnect cannot
//! abandon a load/save cycle halfway through.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use reshub_entity::ResourceView;

use crate::dto::request::ReserveRequest;
use crate::dto::response::{ApiResponse, ReservationResponse};
use crate::error::ApiError;
use crate::extractors::Identity;
use crate::state::AppState;

/// GET /api/resources
pub async fn list_resources(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<ApiResponse<Vec<ResourceView>>>, ApiError> {
    let manager = state.manager.clone();
    let views = tokio::spawn(async move { manager.list_resources(&identity).await })
        .await
        .map_err(join_failed)??;

    Ok(Json(ApiResponse::ok(views)))
}

/// POST /api/resources/{id}/reservation
pub async fn reserve(
    State(state): State<AppState>,
    identity: Identity,
    Path(resource_id): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<ApiResponse<ReservationResponse>>), ApiError> {
    let request = ReserveRequest::from_body(&body)
        .map_err(|e| ApiError::bad_request(format!("Invalid request body: {e}")))?;

    let manager = state.manager.clone();
    let reservation = tokio::spawn(async move {
        manager
            .reserve(&resource_id, &identity, request.until.as_deref())
            .await
    })
    .await
    .map_err(join_failed)??;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(ReservationResponse::from(reservation))),
    ))
}

/// DELETE /api/resources/{id}/reservation
pub async fn release(
    State(state): State<AppState>,
    identity: Identity,
    Path(resource_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let manager = state.manager.clone();
    tokio::spawn(async move { manager.release(&resource_id, &identity).await })
        .await
        .map_err(join_failed)??;

    Ok(StatusCode::NO_CONTENT)
}

fn join_failed(err: tokio::task::JoinError) -> ApiError {
    tracing::error!(error = %err, "Reservation task failed");
    ApiError::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "Reservation task failed",
    )
}

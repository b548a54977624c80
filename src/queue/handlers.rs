use axum::extract::Path;
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::Utc;

use super::service::VirtualQueue;
use super::types::{JoinQueueRequest, PositionedEntry, QueueEntryId, UpdateQueueStatusRequest};
use crate::actor::Actor;
use crate::error::AppError;
use crate::hospital::types::HospitalId;

pub async fn handle_join_queue(
    actor: Actor,
    Path(hospital_id): Path<String>,
    Extension(queue): Extension<VirtualQueue>,
    Json(req): Json<JoinQueueRequest>,
) -> Result<(StatusCode, Json<PositionedEntry>), AppError> {
    let entry = queue
        .join(&actor, &HospitalId(hospital_id), req, Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn handle_get_entry(
    Path(entry_id): Path<String>,
    Extension(queue): Extension<VirtualQueue>,
) -> Result<Json<PositionedEntry>, AppError> {
    Ok(Json(queue.get(&QueueEntryId(entry_id)).await?))
}

pub async fn handle_update_status(
    actor: Actor,
    Path(entry_id): Path<String>,
    Extension(queue): Extension<VirtualQueue>,
    Json(req): Json<UpdateQueueStatusRequest>,
) -> Result<Json<PositionedEntry>, AppError> {
    let entry = queue
        .transition(&actor, &QueueEntryId(entry_id), req.status, Utc::now())
        .await?;
    Ok(Json(entry))
}

pub async fn handle_board(
    actor: Actor,
    Path(hospital_id): Path<String>,
    Extension(queue): Extension<VirtualQueue>,
) -> Result<Json<Vec<PositionedEntry>>, AppError> {
    Ok(Json(queue.board(&actor, &HospitalId(hospital_id)).await?))
}

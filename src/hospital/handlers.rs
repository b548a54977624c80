use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use chrono::Utc;

use super::protocol::{
    RatingResponse, RegisterHospitalRequest, RegisterHospitalResponse, SubmitRatingRequest,
    VerificationRequest,
};
use super::service::HospitalService;
use super::types::{ErWaitUpdate, Hospital, HospitalId, InventoryUpdate};
use crate::actor::Actor;
use crate::error::AppError;
use crate::search::SearchEngine;
use crate::search::types::{DetailParams, Position};

pub async fn handle_register(
    Extension(hospitals): Extension<HospitalService>,
    Json(req): Json<RegisterHospitalRequest>,
) -> Result<(StatusCode, Json<RegisterHospitalResponse>), AppError> {
    let registered = hospitals.register(req, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(registered)))
}

/// Staff of the hospital (or an admin) get the raw record; everyone else the patient view.
pub async fn handle_get_hospital(
    actor: Actor,
    Path(hospital_id): Path<String>,
    Query(params): Query<DetailParams>,
    Extension(hospitals): Extension<HospitalService>,
    Extension(engine): Extension<SearchEngine>,
) -> Result<Response, AppError> {
    let id = HospitalId(hospital_id);
    if actor.is_staff_of(&id) || matches!(actor, Actor::Admin { .. }) {
        let hospital = hospitals.staff_view(&actor, &id).await?;
        return Ok(Json(hospital).into_response());
    }

    let position = Position::parse(params.lat.as_deref(), params.lon.as_deref())?;
    let detail = engine.detail(&id, position).await?;
    Ok(Json(detail).into_response())
}

pub async fn handle_update_inventory(
    actor: Actor,
    Path(hospital_id): Path<String>,
    Extension(hospitals): Extension<HospitalService>,
    Json(update): Json<InventoryUpdate>,
) -> Result<Json<Hospital>, AppError> {
    let hospital = hospitals
        .update_inventory(&actor, &HospitalId(hospital_id), &update, Utc::now())
        .await?;
    Ok(Json(hospital))
}

pub async fn handle_update_er_wait_times(
    actor: Actor,
    Path(hospital_id): Path<String>,
    Extension(hospitals): Extension<HospitalService>,
    Json(update): Json<ErWaitUpdate>,
) -> Result<Json<Hospital>, AppError> {
    let hospital = hospitals
        .update_er_wait_times(&actor, &HospitalId(hospital_id), &update, Utc::now())
        .await?;
    Ok(Json(hospital))
}

pub async fn handle_set_verification(
    actor: Actor,
    Path(hospital_id): Path<String>,
    Extension(hospitals): Extension<HospitalService>,
    Json(req): Json<VerificationRequest>,
) -> Result<Json<Hospital>, AppError> {
    let hospital = hospitals
        .set_verification(&actor, &HospitalId(hospital_id), req.verified, Utc::now())
        .await?;
    Ok(Json(hospital))
}

pub async fn handle_submit_rating(
    actor: Actor,
    Path(hospital_id): Path<String>,
    Extension(hospitals): Extension<HospitalService>,
    Json(req): Json<SubmitRatingRequest>,
) -> Result<Json<RatingResponse>, AppError> {
    let rating = hospitals
        .submit_rating(&actor, &HospitalId(hospital_id), req, Utc::now())
        .await?;
    Ok(Json(rating))
}

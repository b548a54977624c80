use axum::extract::Path;
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::Utc;

use super::service::BookingService;
use super::types::{Booking, BookingId, CreateBookingRequest, UpdateBookingStatusRequest};
use crate::actor::Actor;
use crate::error::AppError;
use crate::hospital::types::HospitalId;

pub async fn handle_create_booking(
    actor: Actor,
    Extension(bookings): Extension<BookingService>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let booking = bookings.create(&actor, req, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

pub async fn handle_update_status(
    actor: Actor,
    Path(booking_id): Path<String>,
    Extension(bookings): Extension<BookingService>,
    Json(req): Json<UpdateBookingStatusRequest>,
) -> Result<Json<Booking>, AppError> {
    let booking = bookings
        .update_status(&actor, &BookingId(booking_id), req.status, Utc::now())
        .await?;
    Ok(Json(booking))
}

pub async fn handle_list_for_hospital(
    actor: Actor,
    Path(hospital_id): Path<String>,
    Extension(bookings): Extension<BookingService>,
) -> Result<Json<Vec<Booking>>, AppError> {
    Ok(Json(
        bookings
            .list_for_hospital(&actor, &HospitalId(hospital_id))
            .await?,
    ))
}

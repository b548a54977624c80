use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::lifecycle::{allowed_transition, authorize, initial_status};
use super::types::{Booking, BookingId, BookingSource, BookingStatus, CreateBookingRequest};
use crate::actor::Actor;
use crate::broadcast::Broadcaster;
use crate::error::AppError;
use crate::hospital::types::HospitalId;
use crate::store::Store;
use crate::validation;

pub const MAX_CONDITION_LEN: usize = 500;

#[derive(Clone)]
pub struct BookingService {
    store: Arc<dyn Store>,
    broadcaster: Broadcaster,
}

impl BookingService {
    pub fn new(store: Arc<dyn Store>, broadcaster: Broadcaster) -> Self {
        Self { store, broadcaster }
    }

    /// Records a patient's booking and notifies the hospital's dashboard.
    pub async fn create(
        &self,
        actor: &Actor,
        req: CreateBookingRequest,
        now: DateTime<Utc>,
    ) -> Result<Booking, AppError> {
        let patient_name = validation::name("patient_name", &req.patient_name)?;
        let patient_phone = validation::phone(&req.patient_phone)?;
        let condition = req.condition.trim().to_string();
        if condition.chars().count() > MAX_CONDITION_LEN {
            return Err(AppError::Validation(format!(
                "condition must be at most {} characters",
                MAX_CONDITION_LEN
            )));
        }
        match (req.source, req.scheduled_at) {
            (BookingSource::Appointment, None) => {
                return Err(AppError::Validation(
                    "appointments require scheduled_at".to_string(),
                ));
            }
            (BookingSource::Appointment, Some(at)) if at <= now => {
                return Err(AppError::Validation(
                    "scheduled_at must be in the future".to_string(),
                ));
            }
            _ => {}
        }

        self.store
            .get_hospital(&req.hospital_id)
            .await?
            .filter(|h| h.is_verified)
            .ok_or_else(|| AppError::NotFound(format!("hospital {} not found", req.hospital_id)))?;

        let booking = Booking {
            id: BookingId::new(),
            hospital_id: req.hospital_id,
            user_id: actor.user_id().cloned(),
            patient_name,
            patient_phone,
            condition,
            severity: req.severity,
            source: req.source,
            status: initial_status(req.source),
            scheduled_at: req.scheduled_at,
            created_at: now,
            updated_at: now,
        };
        let booking = self.store.insert_booking(booking).await?;

        tracing::info!(
            "Booking {} created for {} ({} {})",
            booking.id,
            booking.hospital_id,
            booking.severity,
            booking.status
        );
        self.broadcaster.booking_created(&booking);
        Ok(booking)
    }

    pub async fn update_status(
        &self,
        actor: &Actor,
        id: &BookingId,
        to: BookingStatus,
        now: DateTime<Utc>,
    ) -> Result<Booking, AppError> {
        let booking = self
            .store
            .get_booking(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("booking {} not found", id)))?;

        authorize(actor, &booking, to)?;
        if !allowed_transition(booking.status, to) {
            return Err(AppError::Validation(format!(
                "booking {} cannot move from {} to {}",
                id, booking.status, to
            )));
        }

        let updated = self
            .store
            .transition_booking(id, booking.status, to, now)
            .await?;
        tracing::info!("Booking {} {} -> {}", id, booking.status, to);
        self.broadcaster.booking_updated(&updated);
        Ok(updated)
    }

    /// Staff dashboard listing, newest first.
    pub async fn list_for_hospital(
        &self,
        actor: &Actor,
        hospital_id: &HospitalId,
    ) -> Result<Vec<Booking>, AppError> {
        actor.require_staff_of(hospital_id)?;
        Ok(self.store.bookings_for_hospital(hospital_id).await?)
    }
}

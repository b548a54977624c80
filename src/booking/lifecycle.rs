use super::types::{Booking, BookingSource, BookingStatus};
use crate::actor::Actor;
use crate::error::AppError;

/// `INCOMING -> ADMITTED | DIVERTED | CANCELLED`, `SCHEDULED -> COMPLETED | CANCELLED`.
pub fn allowed_transition(from: BookingStatus, to: BookingStatus) -> bool {
    use BookingStatus::*;
    matches!(
        (from, to),
        (Incoming, Admitted)
            | (Incoming, Diverted)
            | (Incoming, Cancelled)
            | (Scheduled, Completed)
            | (Scheduled, Cancelled)
    )
}

/// Appointments enter the lifecycle as scheduled, everything else as an arrival notice.
pub fn initial_status(source: BookingSource) -> BookingStatus {
    match source {
        BookingSource::Appointment => BookingStatus::Scheduled,
        BookingSource::Triage | BookingSource::Direct => BookingStatus::Incoming,
    }
}

/// Owning-hospital staff may apply any transition. The patient recorded on the booking may
/// cancel it; bookings without a recorded patient can only be cancelled by staff.
pub fn authorize(actor: &Actor, booking: &Booking, to: BookingStatus) -> Result<(), AppError> {
    if actor.is_staff_of(&booking.hospital_id) {
        return Ok(());
    }
    let is_owner = booking.user_id.is_some() && actor.user_id() == booking.user_id.as_ref();
    if to == BookingStatus::Cancelled && is_owner {
        return Ok(());
    }
    Err(AppError::Authorization(format!(
        "not allowed to move booking {} to {}",
        booking.id, to
    )))
}

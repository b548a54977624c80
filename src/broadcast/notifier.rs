use std::sync::Arc;

use super::broker::Broker;
use super::types::{ErWaitTimesChanged, HospitalDelta, HospitalEvent, Room};
use crate::booking::types::Booking;
use crate::hospital::types::Hospital;
use crate::queue::types::PositionedEntry;

/// Maps each accepted mutation onto the rooms and event names observers listen for.
///
/// All methods are fire-and-forget: failures are logged here and never reach the caller.
#[derive(Clone)]
pub struct Broadcaster {
    broker: Arc<dyn Broker>,
}

impl Broadcaster {
    pub fn new(broker: Arc<dyn Broker>) -> Self {
        Self { broker }
    }

    pub fn broker(&self) -> Arc<dyn Broker> {
        self.broker.clone()
    }

    pub fn inventory_changed(&self, hospital: &Hospital) {
        self.emit(
            Room::Hospital(hospital.id.clone()),
            HospitalEvent::HospitalUpdated(Box::new(hospital.clone())),
        );
        self.emit(
            Room::Global,
            HospitalEvent::HospitalUpdatedPublic(HospitalDelta::from(hospital)),
        );
    }

    pub fn er_wait_changed(&self, hospital: &Hospital) {
        self.emit(
            Room::Hospital(hospital.id.clone()),
            HospitalEvent::HospitalUpdated(Box::new(hospital.clone())),
        );
        self.emit(
            Room::Global,
            HospitalEvent::ErWaitTimesUpdated(ErWaitTimesChanged::from(hospital)),
        );
    }

    pub fn booking_created(&self, booking: &Booking) {
        self.emit(
            Room::Hospital(booking.hospital_id.clone()),
            HospitalEvent::NewBooking(Box::new(booking.clone())),
        );
    }

    pub fn booking_updated(&self, booking: &Booking) {
        self.emit(
            Room::Hospital(booking.hospital_id.clone()),
            HospitalEvent::BookingUpdated(Box::new(booking.clone())),
        );
    }

    pub fn queue_entry_changed(&self, entry: &PositionedEntry) {
        self.emit(Room::Global, HospitalEvent::QueueEntryUpdated(entry.clone()));
    }

    /// Rating aggregates change the public card the same way bed counts do.
    pub fn rating_changed(&self, hospital: &Hospital) {
        self.emit(
            Room::Global,
            HospitalEvent::HospitalUpdatedPublic(HospitalDelta::from(hospital)),
        );
    }

    fn emit(&self, room: Room, event: HospitalEvent) {
        let name = event.name();
        match self.broker.publish(&room, event) {
            Ok(delivered) => {
                tracing::debug!("Emitted {} to {} ({} observers)", name, room, delivered)
            }
            Err(e) => tracing::warn!("Dropped {} for {}: {}", name, room, e),
        }
    }
}

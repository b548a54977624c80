use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::booking::types::Booking;
use crate::hospital::types::{BedCounts, ErWaitSnapshot, Hospital, HospitalId, RatingSummary};
use crate::queue::types::PositionedEntry;

/// A delivery scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Room {
    /// Every connected observer.
    Global,
    /// Staff connections of one hospital.
    Hospital(HospitalId),
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Room::Global => f.write_str("global"),
            Room::Hospital(id) => write!(f, "hospital:{}", id),
        }
    }
}

/// Public partial update merged by search pages into the matching result card.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HospitalDelta {
    pub hospital_id: HospitalId,
    pub beds: BedCounts,
    pub total_free_beds: u32,
    pub rating: RatingSummary,
    pub updated_at: DateTime<Utc>,
}

impl From<&Hospital> for HospitalDelta {
    fn from(hospital: &Hospital) -> Self {
        Self {
            hospital_id: hospital.id.clone(),
            beds: hospital.beds,
            total_free_beds: hospital.beds.total(),
            rating: hospital.rating,
            updated_at: hospital.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErWaitTimesChanged {
    pub hospital_id: HospitalId,
    pub er_wait_times: ErWaitSnapshot,
    pub updated_at: DateTime<Utc>,
}

impl From<&Hospital> for ErWaitTimesChanged {
    fn from(hospital: &Hospital) -> Self {
        Self {
            hospital_id: hospital.id.clone(),
            er_wait_times: ErWaitSnapshot::from(hospital.er_wait_times.as_ref()),
            updated_at: hospital.updated_at,
        }
    }
}

/// Wire envelope: `{"event": "<name>", "payload": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum HospitalEvent {
    /// Full record, hospital room only.
    HospitalUpdated(Box<Hospital>),
    HospitalUpdatedPublic(HospitalDelta),
    ErWaitTimesUpdated(ErWaitTimesChanged),
    NewBooking(Box<Booking>),
    BookingUpdated(Box<Booking>),
    QueueEntryUpdated(PositionedEntry),
}

impl HospitalEvent {
    pub fn name(&self) -> &'static str {
        match self {
            HospitalEvent::HospitalUpdated(_) => "hospital_updated",
            HospitalEvent::HospitalUpdatedPublic(_) => "hospital_updated_public",
            HospitalEvent::ErWaitTimesUpdated(_) => "er_wait_times_updated",
            HospitalEvent::NewBooking(_) => "new_booking",
            HospitalEvent::BookingUpdated(_) => "booking_updated",
            HospitalEvent::QueueEntryUpdated(_) => "queue_entry_updated",
        }
    }
}

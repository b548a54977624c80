use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::actor::UserId;
use crate::hospital::types::{HospitalId, Severity};

/// Unique identifier for a booking. Wrapper around a UUID string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct BookingId(pub String);

impl BookingId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for BookingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Represents the lifecycle state of a booking.
///
/// `Incoming` and `Scheduled` are the two entry points; everything else is terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    /// Patient or triage notified the hospital they are on their way.
    Incoming,
    /// Appointment-style booking for a future time.
    Scheduled,
    Admitted,
    /// Hospital redirected the patient elsewhere.
    Diverted,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Incoming => "INCOMING",
            BookingStatus::Scheduled => "SCHEDULED",
            BookingStatus::Admitted => "ADMITTED",
            BookingStatus::Diverted => "DIVERTED",
            BookingStatus::Cancelled => "CANCELLED",
            BookingStatus::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the booking originated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingSource {
    /// Submitted from the emergency triage flow.
    Triage,
    /// Patient picked a hospital from search results.
    Direct,
    /// Appointment for a scheduled time.
    Appointment,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: BookingId,
    pub hospital_id: HospitalId,
    #[serde(default)]
    pub user_id: Option<UserId>,
    pub patient_name: String,
    pub patient_phone: String,
    pub condition: String,
    pub severity: Severity,
    pub source: BookingSource,
    pub status: BookingStatus,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub hospital_id: HospitalId,
    pub patient_name: String,
    pub patient_phone: String,
    #[serde(default)]
    pub condition: String,
    pub severity: Severity,
    #[serde(default = "default_source")]
    pub source: BookingSource,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
}

fn default_source() -> BookingSource {
    BookingSource::Direct
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
}

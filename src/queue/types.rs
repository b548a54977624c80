use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::actor::UserId;
use crate::hospital::types::{HospitalId, Severity};

/// Unique identifier for a queue entry. Wrapper around a UUID string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueueEntryId(pub String);

impl QueueEntryId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for QueueEntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for QueueEntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Represents the lifecycle state of an entry in the virtual queue.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueueStatus {
    /// Checked in and waiting in its severity lane.
    Waiting,
    /// Staff called the patient in.
    Called,
    Completed,
    /// Waited longer than the configured maximum without being called.
    Expired,
    Cancelled,
}

impl QueueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueueStatus::Waiting => "WAITING",
            QueueStatus::Called => "CALLED",
            QueueStatus::Completed => "COMPLETED",
            QueueStatus::Expired => "EXPIRED",
            QueueStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A patient's place in a hospital's virtual queue.
///
/// Position is never stored; it is derived from the other waiting entries on demand.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueueEntry {
    pub id: QueueEntryId,
    pub hospital_id: HospitalId,
    #[serde(default)]
    pub user_id: Option<UserId>,
    pub patient_name: String,
    pub severity: Severity,
    pub status: QueueStatus,
    pub checked_in_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An entry together with its lane-relative position (`None` once it left `Waiting`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PositionedEntry {
    pub entry: QueueEntry,
    pub position: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinQueueRequest {
    pub patient_name: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateQueueStatusRequest {
    pub status: QueueStatus,
}

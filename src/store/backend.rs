//! Storage collaborator contract.
//!
//! The engine never performs read-compute-write on shared counters or statuses in application
//! memory: bed changes and status transitions are handed to the store, which applies them
//! atomically against the current row.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::filter::{HospitalFilter, Page, QueueFilter, StoreSort};
use crate::booking::types::{Booking, BookingId, BookingStatus};
use crate::hospital::types::{
    ErWaitUpdate, Hospital, HospitalId, InventoryUpdate, Rating, RatingSummary, UserAccount,
};
use crate::queue::types::{QueueEntry, QueueEntryId, QueueStatus};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Connectivity loss. Every operation may fail this way.
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
    /// The row is not in the state the write expected, or the write would break an invariant.
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("duplicate: {0}")]
    Duplicate(String),
}

#[async_trait]
pub trait Store: Send + Sync {
    // --- Hospitals ---

    /// Creates the owning account and its hospital together, or neither.
    async fn register_hospital(
        &self,
        account: UserAccount,
        hospital: Hospital,
    ) -> Result<(UserAccount, Hospital), StoreError>;

    async fn insert_hospital(&self, hospital: Hospital) -> Result<Hospital, StoreError>;

    async fn get_hospital(&self, id: &HospitalId) -> Result<Option<Hospital>, StoreError>;

    async fn count_hospitals(&self, filter: &HospitalFilter) -> Result<usize, StoreError>;

    async fn find_hospitals(
        &self,
        filter: &HospitalFilter,
        sort: Option<StoreSort>,
        page: Option<Page>,
    ) -> Result<Vec<Hospital>, StoreError>;

    /// Applies bed counter changes atomically against the current counters.
    async fn apply_bed_changes(
        &self,
        id: &HospitalId,
        update: &InventoryUpdate,
        now: DateTime<Utc>,
    ) -> Result<Hospital, StoreError>;

    async fn update_er_wait_times(
        &self,
        id: &HospitalId,
        update: &ErWaitUpdate,
        now: DateTime<Utc>,
    ) -> Result<Hospital, StoreError>;

    async fn set_verified(
        &self,
        id: &HospitalId,
        verified: bool,
        now: DateTime<Utc>,
    ) -> Result<Hospital, StoreError>;

    // --- Ratings ---

    /// Inserts or replaces the rating for `(user_id, hospital_id)` and refreshes the hospital's
    /// denormalized summary.
    async fn upsert_rating(&self, rating: Rating) -> Result<(Rating, RatingSummary), StoreError>;

    async fn ratings_for_hospital(&self, id: &HospitalId) -> Result<Vec<Rating>, StoreError>;

    // --- Bookings ---

    async fn insert_booking(&self, booking: Booking) -> Result<Booking, StoreError>;

    async fn get_booking(&self, id: &BookingId) -> Result<Option<Booking>, StoreError>;

    /// Compare-and-set: moves the booking to `to` only if it is still in `from`.
    async fn transition_booking(
        &self,
        id: &BookingId,
        from: BookingStatus,
        to: BookingStatus,
        now: DateTime<Utc>,
    ) -> Result<Booking, StoreError>;

    async fn bookings_for_hospital(&self, id: &HospitalId) -> Result<Vec<Booking>, StoreError>;

    // --- Virtual queue ---

    async fn insert_queue_entry(&self, entry: QueueEntry) -> Result<QueueEntry, StoreError>;

    async fn get_queue_entry(&self, id: &QueueEntryId) -> Result<Option<QueueEntry>, StoreError>;

    /// Compare-and-set: moves the entry to `to` only if it is still in `from`.
    async fn transition_queue_entry(
        &self,
        id: &QueueEntryId,
        from: QueueStatus,
        to: QueueStatus,
        now: DateTime<Utc>,
    ) -> Result<QueueEntry, StoreError>;

    async fn find_queue_entries(&self, filter: &QueueFilter) -> Result<Vec<QueueEntry>, StoreError>;

    async fn count_queue_entries(&self, filter: &QueueFilter) -> Result<usize, StoreError>;
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::atomic::{AtomicBool, Ordering};

use super::backend::{Store, StoreError};
use super::filter::{HospitalFilter, Page, QueueFilter, StoreSort};
use crate::actor::UserId;
use crate::booking::types::{Booking, BookingId, BookingStatus};
use crate::hospital::types::{
    ErWaitTimes, ErWaitUpdate, Hospital, HospitalId, InventoryUpdate, Rating, RatingSummary,
    UserAccount,
};
use crate::queue::types::{QueueEntry, QueueEntryId, QueueStatus};

/// In-process store. Each table is a `DashMap`, so row updates happen under the shard lock of
/// that row and concurrent writers to different hospitals never contend.
pub struct MemoryStore {
    hospitals: DashMap<HospitalId, Hospital>,
    accounts: DashMap<UserId, UserAccount>,
    /// Lower-cased email -> account, enforces unique emails.
    emails: DashMap<String, UserId>,
    ratings: DashMap<(UserId, HospitalId), Rating>,
    bookings: DashMap<BookingId, Booking>,
    queue_entries: DashMap<QueueEntryId, QueueEntry>,
    /// Simulated connectivity, lets tests exercise the outage path.
    available: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            hospitals: DashMap::new(),
            accounts: DashMap::new(),
            emails: DashMap::new(),
            ratings: DashMap::new(),
            bookings: DashMap::new(),
            queue_entries: DashMap::new(),
            available: AtomicBool::new(true),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
        if !available {
            tracing::warn!("Memory store marked unavailable");
        }
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    pub fn hospital_count(&self) -> usize {
        self.hospitals.len()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("memory store offline".to_string()))
        }
    }

    fn hospital_not_found(id: &HospitalId) -> StoreError {
        StoreError::NotFound {
            entity: "hospital",
            id: id.0.clone(),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn register_hospital(
        &self,
        account: UserAccount,
        hospital: Hospital,
    ) -> Result<(UserAccount, Hospital), StoreError> {
        self.check_available()?;
        let email_key = account.email.trim().to_lowercase();

        // Holding the email slot makes the two inserts below all-or-nothing for this email.
        match self.emails.entry(email_key) {
            Entry::Occupied(slot) => Err(StoreError::Duplicate(format!(
                "an account with email {} already exists",
                slot.key()
            ))),
            Entry::Vacant(slot) => {
                if self.hospitals.contains_key(&hospital.id) {
                    return Err(StoreError::Duplicate(format!(
                        "hospital {} already exists",
                        hospital.id
                    )));
                }
                if self.accounts.contains_key(&account.id) {
                    return Err(StoreError::Duplicate(format!(
                        "account {} already exists",
                        account.id
                    )));
                }
                self.hospitals.insert(hospital.id.clone(), hospital.clone());
                self.accounts.insert(account.id.clone(), account.clone());
                slot.insert(account.id.clone());
                tracing::info!("Registered hospital {} owned by {}", hospital.id, account.id);
                Ok((account, hospital))
            }
        }
    }

    async fn insert_hospital(&self, hospital: Hospital) -> Result<Hospital, StoreError> {
        self.check_available()?;
        match self.hospitals.entry(hospital.id.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate(format!(
                "hospital {} already exists",
                hospital.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(hospital.clone());
                Ok(hospital)
            }
        }
    }

    async fn get_hospital(&self, id: &HospitalId) -> Result<Option<Hospital>, StoreError> {
        self.check_available()?;
        Ok(self.hospitals.get(id).map(|h| h.value().clone()))
    }

    async fn count_hospitals(&self, filter: &HospitalFilter) -> Result<usize, StoreError> {
        self.check_available()?;
        Ok(self
            .hospitals
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .count())
    }

    async fn find_hospitals(
        &self,
        filter: &HospitalFilter,
        sort: Option<StoreSort>,
        page: Option<Page>,
    ) -> Result<Vec<Hospital>, StoreError> {
        self.check_available()?;
        let mut rows: Vec<Hospital> = self
            .hospitals
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();

        match sort {
            Some(sort) => rows.sort_by(|a, b| sort.compare(a, b)),
            None => rows.sort_by(|a, b| a.id.cmp(&b.id)),
        }

        Ok(match page {
            Some(page) => rows.into_iter().skip(page.offset).take(page.limit).collect(),
            None => rows,
        })
    }

    async fn apply_bed_changes(
        &self,
        id: &HospitalId,
        update: &InventoryUpdate,
        now: DateTime<Utc>,
    ) -> Result<Hospital, StoreError> {
        self.check_available()?;
        let mut hospital = self
            .hospitals
            .get_mut(id)
            .ok_or_else(|| Self::hospital_not_found(id))?;

        let beds = hospital.beds.apply(update).map_err(StoreError::Conflict)?;
        hospital.beds = beds;
        hospital.updated_at = now;
        tracing::debug!("Beds for {} now {:?}", id, beds);
        Ok(hospital.clone())
    }

    async fn update_er_wait_times(
        &self,
        id: &HospitalId,
        update: &ErWaitUpdate,
        now: DateTime<Utc>,
    ) -> Result<Hospital, StoreError> {
        self.check_available()?;
        let mut hospital = self
            .hospitals
            .get_mut(id)
            .ok_or_else(|| Self::hospital_not_found(id))?;

        let merged = ErWaitTimes::merged(hospital.er_wait_times.as_ref(), update, now);
        hospital.er_wait_times = Some(merged);
        hospital.updated_at = now;
        Ok(hospital.clone())
    }

    async fn set_verified(
        &self,
        id: &HospitalId,
        verified: bool,
        now: DateTime<Utc>,
    ) -> Result<Hospital, StoreError> {
        self.check_available()?;
        let mut hospital = self
            .hospitals
            .get_mut(id)
            .ok_or_else(|| Self::hospital_not_found(id))?;
        hospital.is_verified = verified;
        hospital.updated_at = now;
        Ok(hospital.clone())
    }

    async fn upsert_rating(&self, rating: Rating) -> Result<(Rating, RatingSummary), StoreError> {
        self.check_available()?;
        // Held until the summary is written, so upserts for one hospital apply one at a time.
        let mut hospital = self
            .hospitals
            .get_mut(&rating.hospital_id)
            .ok_or_else(|| Self::hospital_not_found(&rating.hospital_id))?;

        let key = (rating.user_id.clone(), rating.hospital_id.clone());
        let stored = match self.ratings.entry(key) {
            Entry::Occupied(mut slot) => {
                let existing = slot.get_mut();
                existing.value = rating.value;
                existing.comment = rating.comment;
                existing.updated_at = rating.updated_at;
                existing.clone()
            }
            Entry::Vacant(slot) => slot.insert(rating).clone(),
        };

        let summary = RatingSummary::fold(
            self.ratings
                .iter()
                .filter(|entry| entry.key().1 == stored.hospital_id)
                .map(|entry| entry.value().value),
        );
        hospital.rating = summary;

        Ok((stored, summary))
    }

    async fn ratings_for_hospital(&self, id: &HospitalId) -> Result<Vec<Rating>, StoreError> {
        self.check_available()?;
        Ok(self
            .ratings
            .iter()
            .filter(|entry| &entry.key().1 == id)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn insert_booking(&self, booking: Booking) -> Result<Booking, StoreError> {
        self.check_available()?;
        match self.bookings.entry(booking.id.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate(format!(
                "booking {} already exists",
                booking.id
            ))),
            Entry::Vacant(slot) => Ok(slot.insert(booking).clone()),
        }
    }

    async fn get_booking(&self, id: &BookingId) -> Result<Option<Booking>, StoreError> {
        self.check_available()?;
        Ok(self.bookings.get(id).map(|b| b.value().clone()))
    }

    async fn transition_booking(
        &self,
        id: &BookingId,
        from: BookingStatus,
        to: BookingStatus,
        now: DateTime<Utc>,
    ) -> Result<Booking, StoreError> {
        self.check_available()?;
        let mut booking = self.bookings.get_mut(id).ok_or_else(|| StoreError::NotFound {
            entity: "booking",
            id: id.0.clone(),
        })?;

        // Another writer may have moved the booking since the caller read it.
        if booking.status != from {
            return Err(StoreError::Conflict(format!(
                "booking {} is {}, expected {}",
                id, booking.status, from
            )));
        }
        booking.status = to;
        booking.updated_at = now;
        Ok(booking.clone())
    }

    async fn bookings_for_hospital(&self, id: &HospitalId) -> Result<Vec<Booking>, StoreError> {
        self.check_available()?;
        let mut rows: Vec<Booking> = self
            .bookings
            .iter()
            .filter(|entry| &entry.value().hospital_id == id)
            .map(|entry| entry.value().clone())
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert_queue_entry(&self, entry: QueueEntry) -> Result<QueueEntry, StoreError> {
        self.check_available()?;
        match self.queue_entries.entry(entry.id.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate(format!(
                "queue entry {} already exists",
                entry.id
            ))),
            Entry::Vacant(slot) => Ok(slot.insert(entry).clone()),
        }
    }

    async fn get_queue_entry(&self, id: &QueueEntryId) -> Result<Option<QueueEntry>, StoreError> {
        self.check_available()?;
        Ok(self.queue_entries.get(id).map(|e| e.value().clone()))
    }

    async fn transition_queue_entry(
        &self,
        id: &QueueEntryId,
        from: QueueStatus,
        to: QueueStatus,
        now: DateTime<Utc>,
    ) -> Result<QueueEntry, StoreError> {
        self.check_available()?;
        let mut entry = self
            .queue_entries
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "queue entry",
                id: id.0.clone(),
            })?;

        if entry.status != from {
            return Err(StoreError::Conflict(format!(
                "queue entry {} is {}, expected {}",
                id, entry.status, from
            )));
        }
        entry.status = to;
        entry.updated_at = now;
        Ok(entry.clone())
    }

    async fn find_queue_entries(&self, filter: &QueueFilter) -> Result<Vec<QueueEntry>, StoreError> {
        self.check_available()?;
        Ok(self
            .queue_entries
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn count_queue_entries(&self, filter: &QueueFilter) -> Result<usize, StoreError> {
        self.check_available()?;
        Ok(self
            .queue_entries
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .count())
    }
}

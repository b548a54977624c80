use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use super::types::{JoinQueueRequest, PositionedEntry, QueueEntry, QueueEntryId, QueueStatus};
use crate::actor::Actor;
use crate::broadcast::Broadcaster;
use crate::error::AppError;
use crate::hospital::types::HospitalId;
use crate::store::filter::QueueFilter;
use crate::store::{Store, StoreError};
use crate::validation;

/// The queue state machine. Terminal states allow nothing.
pub fn allowed_transition(from: QueueStatus, to: QueueStatus) -> bool {
    use QueueStatus::*;
    matches!(
        (from, to),
        (Waiting, Called)
            | (Waiting, Expired)
            | (Waiting, Cancelled)
            | (Called, Completed)
            | (Called, Cancelled)
    )
}

/// Per-hospital waiting lists, one lane per severity.
///
/// Entries are ordered by severity (most urgent first) and then check-in time. Positions are
/// derived on every read and are advisory.
#[derive(Clone)]
pub struct VirtualQueue {
    store: Arc<dyn Store>,
    broadcaster: Broadcaster,
    /// Waiting entries older than this are expired by the sweeper.
    max_wait: Duration,
}

impl VirtualQueue {
    pub fn new(store: Arc<dyn Store>, broadcaster: Broadcaster, max_wait: Duration) -> Self {
        Self {
            store,
            broadcaster,
            max_wait,
        }
    }

    /// Checks a patient in and returns the new entry with its position.
    pub async fn join(
        &self,
        actor: &Actor,
        hospital_id: &HospitalId,
        req: JoinQueueRequest,
        now: DateTime<Utc>,
    ) -> Result<PositionedEntry, AppError> {
        let patient_name = validation::name("patient_name", &req.patient_name)?;
        self.store
            .get_hospital(hospital_id)
            .await?
            .filter(|h| h.is_verified)
            .ok_or_else(|| AppError::NotFound(format!("hospital {} not found", hospital_id)))?;

        let entry = QueueEntry {
            id: QueueEntryId::new(),
            hospital_id: hospital_id.clone(),
            user_id: actor.user_id().cloned(),
            patient_name,
            severity: req.severity,
            status: QueueStatus::Waiting,
            checked_in_at: now,
            updated_at: now,
        };
        let entry = self.store.insert_queue_entry(entry).await?;
        let positioned = self.with_position(entry).await?;

        tracing::info!(
            "Queue entry {} joined {} as {} (position {:?})",
            positioned.entry.id,
            hospital_id,
            positioned.entry.severity,
            positioned.position
        );
        self.broadcaster.queue_entry_changed(&positioned);
        Ok(positioned)
    }

    pub async fn get(&self, id: &QueueEntryId) -> Result<PositionedEntry, AppError> {
        let entry = self.load(id).await?;
        self.with_position(entry).await
    }

    /// Lane-relative position: waiting entries of the same hospital and severity that checked in
    /// no later than this one. `None` once the entry left `Waiting`.
    pub async fn position(&self, entry: &QueueEntry) -> Result<Option<usize>, AppError> {
        if entry.status != QueueStatus::Waiting {
            return Ok(None);
        }
        let filter = QueueFilter {
            hospital_id: Some(entry.hospital_id.clone()),
            status: Some(QueueStatus::Waiting),
            severity: Some(entry.severity),
            checked_in_at_or_before: Some(entry.checked_in_at),
        };
        // A waiting entry always counts itself, even if the stored copy has already moved on
        let ahead = self.store.count_queue_entries(&filter).await?;
        Ok(Some(ahead.max(1)))
    }

    /// Moves an entry along the state machine.
    ///
    /// Staff of the entry's hospital may apply any legal transition; the patient who joined may
    /// only cancel.
    pub async fn transition(
        &self,
        actor: &Actor,
        id: &QueueEntryId,
        to: QueueStatus,
        now: DateTime<Utc>,
    ) -> Result<PositionedEntry, AppError> {
        let entry = self.load(id).await?;

        let is_owner = entry.user_id.is_some() && actor.user_id() == entry.user_id.as_ref();
        let permitted = actor.is_staff_of(&entry.hospital_id) || (to == QueueStatus::Cancelled && is_owner);
        if !permitted {
            return Err(AppError::Authorization(format!(
                "not allowed to move queue entry {} to {}",
                id, to
            )));
        }
        if !allowed_transition(entry.status, to) {
            return Err(AppError::Validation(format!(
                "queue entry {} cannot move from {} to {}",
                id, entry.status, to
            )));
        }

        let updated = self
            .store
            .transition_queue_entry(id, entry.status, to, now)
            .await?;
        tracing::info!("Queue entry {} {} -> {}", id, entry.status, to);

        let positioned = PositionedEntry {
            entry: updated,
            position: None,
        };
        self.broadcaster.queue_entry_changed(&positioned);
        Ok(positioned)
    }

    /// Staff view: every waiting entry, most urgent lane first, each with its lane position.
    pub async fn board(&self, actor: &Actor, hospital_id: &HospitalId) -> Result<Vec<PositionedEntry>, AppError> {
        actor.require_staff_of(hospital_id)?;

        let filter = QueueFilter {
            hospital_id: Some(hospital_id.clone()),
            status: Some(QueueStatus::Waiting),
            ..Default::default()
        };
        let mut waiting = self.store.find_queue_entries(&filter).await?;
        waiting.sort_by(|a, b| {
            b.severity
                .urgency()
                .cmp(&a.severity.urgency())
                .then(a.checked_in_at.cmp(&b.checked_in_at))
                .then_with(|| a.id.cmp(&b.id))
        });

        let board = waiting
            .iter()
            .map(|entry| {
                let position = waiting
                    .iter()
                    .filter(|other| {
                        other.severity == entry.severity && other.checked_in_at <= entry.checked_in_at
                    })
                    .count();
                PositionedEntry {
                    entry: entry.clone(),
                    position: Some(position),
                }
            })
            .collect();
        Ok(board)
    }

    /// Expires every waiting entry that checked in more than `max_wait` before `now`.
    pub async fn sweep_once(&self, now: DateTime<Utc>) -> Result<Vec<QueueEntry>, AppError> {
        let filter = QueueFilter {
            status: Some(QueueStatus::Waiting),
            checked_in_at_or_before: Some(now - self.max_wait),
            ..Default::default()
        };
        let stale = self.store.find_queue_entries(&filter).await?;

        let mut expired = Vec::with_capacity(stale.len());
        for entry in stale {
            match self
                .store
                .transition_queue_entry(&entry.id, QueueStatus::Waiting, QueueStatus::Expired, now)
                .await
            {
                Ok(updated) => {
                    self.broadcaster.queue_entry_changed(&PositionedEntry {
                        entry: updated.clone(),
                        position: None,
                    });
                    expired.push(updated);
                }
                // Called or cancelled since the scan.
                Err(StoreError::Conflict(_)) => {
                    tracing::debug!("Queue entry {} left waiting before expiry", entry.id)
                }
                Err(e) => return Err(e.into()),
            }
        }

        if !expired.is_empty() {
            tracing::info!("Expired {} stale queue entries", expired.len());
        }
        Ok(expired)
    }

    async fn load(&self, id: &QueueEntryId) -> Result<QueueEntry, AppError> {
        self.store
            .get_queue_entry(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("queue entry {} not found", id)))
    }

    async fn with_position(&self, entry: QueueEntry) -> Result<PositionedEntry, AppError> {
        let position = self.position(&entry).await?;
        Ok(PositionedEntry { entry, position })
    }
}

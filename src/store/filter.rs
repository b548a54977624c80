//! Query predicates the store can evaluate natively.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::hospital::types::{BedType, Hospital, HospitalId, Severity};
use crate::queue::types::{QueueEntry, QueueStatus};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HospitalFilter {
    /// `Some(true)` on every patient-facing path.
    pub verified: Option<bool>,
    /// Case-insensitive substring of any specialization department.
    pub specialization: Option<String>,
    pub min_rating: Option<f64>,
    /// Requires at least one free bed of this type.
    pub bed_type: Option<BedType>,
}

impl HospitalFilter {
    /// Filter used by search and browse. Verification cannot be switched off.
    pub fn patient_facing() -> Self {
        Self {
            verified: Some(true),
            ..Default::default()
        }
    }

    pub fn matches(&self, hospital: &Hospital) -> bool {
        if let Some(verified) = self.verified
            && hospital.is_verified != verified
        {
            return false;
        }
        if let Some(needle) = &self.specialization {
            let needle = needle.to_lowercase();
            let found = hospital
                .specializations
                .iter()
                .any(|s| s.department.to_lowercase().contains(&needle));
            if !found {
                return false;
            }
        }
        if let Some(min) = self.min_rating
            && hospital.rating.average < min
        {
            return false;
        }
        if let Some(bed_type) = self.bed_type
            && hospital.beds.get(bed_type) == 0
        {
            return false;
        }
        true
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Orderings the store can apply without derived data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreSortField {
    Name,
    Rating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreSort {
    pub field: StoreSortField,
    pub direction: SortDirection,
}

impl StoreSort {
    /// Direction applies to the field; the id tie-break is always ascending.
    pub fn compare(&self, a: &Hospital, b: &Hospital) -> Ordering {
        let primary = match self.field {
            StoreSortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            StoreSortField::Rating => a
                .rating
                .average
                .total_cmp(&b.rating.average)
                .then(a.rating.count.cmp(&b.rating.count)),
        };
        self.direction.apply(primary).then_with(|| a.id.cmp(&b.id))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: usize,
    pub limit: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueueFilter {
    pub hospital_id: Option<HospitalId>,
    pub status: Option<QueueStatus>,
    pub severity: Option<Severity>,
    /// Inclusive upper bound on `checked_in_at`.
    pub checked_in_at_or_before: Option<DateTime<Utc>>,
}

impl QueueFilter {
    pub fn matches(&self, entry: &QueueEntry) -> bool {
        self.hospital_id
            .as_ref()
            .is_none_or(|id| &entry.hospital_id == id)
            && self.status.is_none_or(|s| entry.status == s)
            && self.severity.is_none_or(|s| entry.severity == s)
            && self
                .checked_in_at_or_before
                .is_none_or(|cutoff| entry.checked_in_at <= cutoff)
    }
}

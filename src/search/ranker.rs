use std::cmp::Ordering;

use super::types::SortMode;
use crate::hospital::types::Hospital;
use crate::store::filter::{SortDirection, StoreSort, StoreSortField};

/// Floor applied to hospitals with nothing free, so they sink below every hospital with a bed.
pub const NO_CAPACITY_PENALTY: f64 = -1000.0;

/// Single sortable number combining free capacity and distance. Higher is better.
pub fn viability(free_beds: u32, distance_km: Option<f64>) -> f64 {
    let free = free_beds as f64;
    match distance_km {
        Some(distance) if free_beds == 0 => NO_CAPACITY_PENALTY - distance,
        Some(distance) => free * 10.0 - distance * 5.0,
        None => free * 10.0,
    }
}

/// A hospital with the derived fields the in-memory orderings need.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub hospital: Hospital,
    pub distance_km: Option<f64>,
    pub relevance: u32,
    pub viability: f64,
}

impl Candidate {
    pub fn new(hospital: Hospital, distance_km: Option<f64>, relevance: u32) -> Self {
        let viability = viability(hospital.beds.total(), distance_km);
        Self {
            hospital,
            distance_km,
            relevance,
            viability,
        }
    }
}

fn by_id(a: &Candidate, b: &Candidate) -> Ordering {
    a.hospital.id.cmp(&b.hospital.id)
}

fn by_distance(a: &Candidate, b: &Candidate) -> Ordering {
    match (a.distance_km, b.distance_km) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Query-mode order: score descending, then nearest (with a position) or name, then id.
pub fn compare_relevance(a: &Candidate, b: &Candidate) -> Ordering {
    let tie = if a.distance_km.is_some() && b.distance_km.is_some() {
        by_distance(a, b)
    } else {
        a.hospital
            .name
            .to_lowercase()
            .cmp(&b.hospital.name.to_lowercase())
    };
    b.relevance.cmp(&a.relevance).then(tie).then_with(|| by_id(a, b))
}

/// Orders candidates for `mode`. `direction` applies to the primary key only; ids always
/// break ties ascending.
pub fn compare(mode: SortMode, direction: SortDirection, a: &Candidate, b: &Candidate) -> Ordering {
    match mode {
        SortMode::Availability => direction
            .apply(a.viability.total_cmp(&b.viability))
            .then_with(|| by_id(a, b)),
        SortMode::Distance => direction.apply(by_distance(a, b)).then_with(|| by_id(a, b)),
        SortMode::Name => StoreSort {
            field: StoreSortField::Name,
            direction,
        }
        .compare(&a.hospital, &b.hospital),
        SortMode::Rating => StoreSort {
            field: StoreSortField::Rating,
            direction,
        }
        .compare(&a.hospital, &b.hospital),
    }
}

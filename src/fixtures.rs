//! Shared builders for unit tests.

use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

use crate::actor::{Actor, UserId};
use crate::hospital::types::{BedCounts, Hospital, HospitalId};
use crate::store::{MemoryStore, Store};

pub fn at(minute: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap() + chrono::Duration::minutes(minute)
}

/// A verified hospital in Bangalore with nothing available.
pub fn hospital(id: &str, name: &str) -> Hospital {
    Hospital {
        id: HospitalId(id.to_string()),
        owner_id: UserId(format!("owner-{}", id)),
        name: name.to_string(),
        address: "1 Main Road".to_string(),
        city: "Bangalore".to_string(),
        state: "Karnataka".to_string(),
        pincode: "560001".to_string(),
        phone: None,
        latitude: 12.90,
        longitude: 77.60,
        is_verified: true,
        beds: BedCounts::default(),
        specializations: vec![],
        diagnostics: Default::default(),
        critical_care: Default::default(),
        support_services: Default::default(),
        er_wait_times: None,
        rating: Default::default(),
        created_at: at(0),
        updated_at: at(0),
    }
}

pub fn with_beds(mut hospital: Hospital, general: u32, icu: u32, oxygen: u32) -> Hospital {
    hospital.beds = BedCounts { general, icu, oxygen };
    hospital
}

pub async fn store_with(hospitals: Vec<Hospital>) -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    for hospital in hospitals {
        store.insert_hospital(hospital).await.unwrap();
    }
    store
}

pub fn staff(hospital_id: &str) -> Actor {
    Actor::Staff {
        user_id: UserId(format!("staff-{}", hospital_id)),
        hospital_id: HospitalId(hospital_id.to_string()),
    }
}

pub fn patient(user_id: &str) -> Actor {
    Actor::Patient {
        user_id: UserId(user_id.to_string()),
    }
}

//! Store Module Tests
//!
//! Exercises the in-memory backend against the `Store` contract.
//!
//! ## Test Scopes
//! - **Filtering & paging**: verified flag, specialization, rating and bed predicates; pushdown sorts.
//! - **Atomic paths**: bed changes, compare-and-set transitions, registration.
//! - **Outage**: every call fails with `Unavailable` while the store is offline.

#[cfg(test)]
mod tests {
    use crate::actor::UserId;
    use crate::booking::types::{Booking, BookingId, BookingSource, BookingStatus};
    use crate::fixtures::{at, hospital, store_with, with_beds};
    use crate::hospital::types::{
        AccountRole, BedChange, BedType, HospitalId, InventoryUpdate, Rating, Severity,
        Specialization, UserAccount,
    };
    use crate::queue::types::{QueueEntry, QueueEntryId, QueueStatus};
    use crate::store::filter::{
        HospitalFilter, Page, QueueFilter, SortDirection, StoreSort, StoreSortField,
    };
    use crate::store::{MemoryStore, Store, StoreError};

    fn account(email: &str) -> UserAccount {
        UserAccount {
            id: UserId::new(),
            email: email.to_string(),
            display_name: "Front Desk".to_string(),
            role: AccountRole::Staff,
            created_at: at(0),
        }
    }

    fn rating(user: &str, hospital_id: &str, value: u8) -> Rating {
        Rating {
            user_id: UserId(user.to_string()),
            hospital_id: HospitalId(hospital_id.to_string()),
            value,
            comment: None,
            created_at: at(0),
            updated_at: at(0),
        }
    }

    fn booking(hospital_id: &str, status: BookingStatus, minute: i64) -> Booking {
        Booking {
            id: BookingId::new(),
            hospital_id: HospitalId(hospital_id.to_string()),
            user_id: None,
            patient_name: "Asha".to_string(),
            patient_phone: "+919800000000".to_string(),
            condition: "chest pain".to_string(),
            severity: Severity::Critical,
            source: BookingSource::Triage,
            status,
            scheduled_at: None,
            created_at: at(minute),
            updated_at: at(minute),
        }
    }

    fn queue_entry(hospital_id: &str, severity: Severity, minute: i64) -> QueueEntry {
        QueueEntry {
            id: QueueEntryId::new(),
            hospital_id: HospitalId(hospital_id.to_string()),
            user_id: None,
            patient_name: "Ravi".to_string(),
            severity,
            status: QueueStatus::Waiting,
            checked_in_at: at(minute),
            updated_at: at(minute),
        }
    }

    // ============================================================
    // FILTER & PAGING TESTS
    // ============================================================

    #[tokio::test]
    async fn test_patient_facing_filter_hides_unverified() {
        let mut hidden = hospital("h-2", "Hidden Clinic");
        hidden.is_verified = false;
        let store = store_with(vec![hospital("h-1", "City General"), hidden]).await;

        let filter = HospitalFilter::patient_facing();
        let rows = store.find_hospitals(&filter, None, None).await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id.0, "h-1");
        assert_eq!(store.count_hospitals(&filter).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_specialization_bed_and_rating_filters() {
        let mut cardio = with_beds(hospital("h-1", "Heart Centre"), 0, 3, 0);
        cardio.specializations.push(Specialization {
            department: "Cardiology".to_string(),
            key_equipment: vec![],
        });
        cardio.rating.average = 4.5;
        let plain = with_beds(hospital("h-2", "Plain"), 5, 0, 0);
        let store = store_with(vec![cardio, plain]).await;

        let filter = HospitalFilter {
            specialization: Some("CARDIO".to_string()),
            ..HospitalFilter::patient_facing()
        };
        assert_eq!(store.count_hospitals(&filter).await.unwrap(), 1);

        let filter = HospitalFilter {
            bed_type: Some(BedType::Icu),
            ..HospitalFilter::patient_facing()
        };
        let rows = store.find_hospitals(&filter, None, None).await.unwrap();
        assert_eq!(rows[0].id.0, "h-1");

        let filter = HospitalFilter {
            min_rating: Some(4.0),
            ..HospitalFilter::patient_facing()
        };
        assert_eq!(store.count_hospitals(&filter).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_pushdown_sort_and_page() {
        let store = store_with(vec![
            hospital("h-1", "Charlie"),
            hospital("h-2", "alpha"),
            hospital("h-3", "Bravo"),
        ])
        .await;

        let sort = StoreSort {
            field: StoreSortField::Name,
            direction: SortDirection::Asc,
        };
        let page = Page { offset: 1, limit: 1 };
        let rows = store
            .find_hospitals(&HospitalFilter::patient_facing(), Some(sort), Some(page))
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Bravo");
    }

    // ============================================================
    // ATOMIC PATH TESTS
    // ============================================================

    #[tokio::test]
    async fn test_bed_changes_apply_set_and_delta() {
        let store = store_with(vec![with_beds(hospital("h-1", "A"), 4, 2, 1)]).await;
        let update = InventoryUpdate {
            general: Some(BedChange::Delta(-1)),
            icu: Some(BedChange::Set(7)),
            oxygen: None,
        };

        let updated = store
            .apply_bed_changes(&HospitalId("h-1".into()), &update, at(5))
            .await
            .unwrap();

        assert_eq!((updated.beds.general, updated.beds.icu, updated.beds.oxygen), (3, 7, 1));
        assert_eq!(updated.updated_at, at(5));
    }

    #[tokio::test]
    async fn test_bed_changes_never_go_negative() {
        let store = store_with(vec![with_beds(hospital("h-1", "A"), 1, 0, 0)]).await;
        let update = InventoryUpdate {
            general: Some(BedChange::Delta(-1)),
            icu: Some(BedChange::Delta(-1)),
            oxygen: None,
        };

        let result = store
            .apply_bed_changes(&HospitalId("h-1".into()), &update, at(1))
            .await;

        // Whole update rejected, general untouched
        assert!(matches!(result, Err(StoreError::Conflict(_))));
        let current = store.get_hospital(&HospitalId("h-1".into())).await.unwrap().unwrap();
        assert_eq!(current.beds.general, 1);
    }

    #[tokio::test]
    async fn test_concurrent_decrements_are_not_lost() {
        let store = store_with(vec![with_beds(hospital("h-1", "A"), 50, 0, 0)]).await;
        let mut handles = Vec::new();
        for _ in 0..50 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let update = InventoryUpdate {
                    general: Some(BedChange::Delta(-1)),
                    ..Default::default()
                };
                store
                    .apply_bed_changes(&HospitalId("h-1".into()), &update, at(1))
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let current = store.get_hospital(&HospitalId("h-1".into())).await.unwrap().unwrap();
        assert_eq!(current.beds.general, 0);
    }

    #[tokio::test]
    async fn test_booking_transition_is_compare_and_set() {
        let store = MemoryStore::new();
        let created = store
            .insert_booking(booking("h-1", BookingStatus::Incoming, 0))
            .await
            .unwrap();

        let first = store
            .transition_booking(&created.id, BookingStatus::Incoming, BookingStatus::Admitted, at(1))
            .await;
        let second = store
            .transition_booking(&created.id, BookingStatus::Incoming, BookingStatus::Diverted, at(2))
            .await;

        assert_eq!(first.unwrap().status, BookingStatus::Admitted);
        assert!(matches!(second, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_bookings_for_hospital_newest_first() {
        let store = MemoryStore::new();
        store.insert_booking(booking("h-1", BookingStatus::Incoming, 1)).await.unwrap();
        store.insert_booking(booking("h-1", BookingStatus::Incoming, 9)).await.unwrap();
        store.insert_booking(booking("h-2", BookingStatus::Incoming, 5)).await.unwrap();

        let rows = store.bookings_for_hospital(&HospitalId("h-1".into())).await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].created_at, at(9));
    }

    #[tokio::test]
    async fn test_queue_filter_counts_lane() {
        let store = MemoryStore::new();
        store.insert_queue_entry(queue_entry("h-1", Severity::Low, 0)).await.unwrap();
        store.insert_queue_entry(queue_entry("h-1", Severity::Low, 5)).await.unwrap();
        store.insert_queue_entry(queue_entry("h-1", Severity::Critical, 1)).await.unwrap();

        let filter = QueueFilter {
            hospital_id: Some(HospitalId("h-1".into())),
            status: Some(QueueStatus::Waiting),
            severity: Some(Severity::Low),
            checked_in_at_or_before: Some(at(3)),
        };

        assert_eq!(store.count_queue_entries(&filter).await.unwrap(), 1);
    }

    // ============================================================
    // REGISTRATION & RATING TESTS
    // ============================================================

    #[tokio::test]
    async fn test_registration_rejects_duplicate_email_atomically() {
        let store = MemoryStore::new();
        store
            .register_hospital(account("desk@city.org"), hospital("h-1", "City"))
            .await
            .unwrap();

        let result = store
            .register_hospital(account("Desk@City.org"), hospital("h-2", "Other"))
            .await;

        assert!(matches!(result, Err(StoreError::Duplicate(_))));
        assert_eq!(store.account_count(), 1);
        assert_eq!(store.hospital_count(), 1);
    }

    #[tokio::test]
    async fn test_rating_upsert_keeps_one_row() {
        let store = store_with(vec![hospital("h-1", "A")]).await;

        store.upsert_rating(rating("u-1", "h-1", 4)).await.unwrap();
        let (stored, summary) = store.upsert_rating(rating("u-1", "h-1", 2)).await.unwrap();

        let rows = store.ratings_for_hospital(&HospitalId("h-1".into())).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(stored.value, 2);
        assert_eq!(summary.count, 1);
        assert_eq!(summary.average, 2.0);
    }

    #[tokio::test]
    async fn test_rating_summary_refreshed_on_hospital() {
        let store = store_with(vec![hospital("h-1", "A")]).await;

        store.upsert_rating(rating("u-1", "h-1", 5)).await.unwrap();
        store.upsert_rating(rating("u-2", "h-1", 4)).await.unwrap();
        store.upsert_rating(rating("u-3", "h-1", 4)).await.unwrap();

        let hospital = store.get_hospital(&HospitalId("h-1".into())).await.unwrap().unwrap();
        assert_eq!(hospital.rating.count, 3);
        assert_eq!(hospital.rating.average, 4.3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_ratings_keep_summary_complete() {
        let store = store_with(vec![hospital("h-1", "A")]).await;
        let mut handles = Vec::new();
        for i in 0..40u8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let user = format!("u-{}", i);
                store.upsert_rating(rating(&user, "h-1", 1 + i % 5)).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        // Every user rated 1..=5 evenly, so the average is exactly 3
        let hospital = store.get_hospital(&HospitalId("h-1".into())).await.unwrap().unwrap();
        assert_eq!(hospital.rating.count, 40);
        assert_eq!(hospital.rating.average, 3.0);
    }

    // ============================================================
    // OUTAGE TESTS
    // ============================================================

    #[tokio::test]
    async fn test_offline_store_fails_with_unavailable() {
        let store = store_with(vec![hospital("h-1", "A")]).await;
        store.set_available(false);

        let result = store.get_hospital(&HospitalId("h-1".into())).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));

        store.set_available(true);
        assert!(store.get_hospital(&HospitalId("h-1".into())).await.unwrap().is_some());
    }
}

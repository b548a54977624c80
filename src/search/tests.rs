//! Search Module Tests
//!
//! Validates the discovery pipeline, from query expansion through scoring, ranking and paging.
//!
//! ## Test Scopes
//! - **Tokenizer**: Normalization, tokens and synonym variants.
//! - **Scoring**: Field weights, resource bonuses and the substring direction.
//! - **Ranking**: The viability formula and tie-breaks.
//! - **Parsing**: Parameter validation and sort defaults.
//! - **Pipeline**: Verified-only visibility, pagination, enrichment and failure handling.
//! - **Suggest**: Per-category caps.

#[cfg(test)]
mod tests {
    use crate::actor::UserId;
    use crate::error::AppError;
    use crate::fixtures::{at, hospital, store_with, with_beds};
    use crate::hospital::types::{Capability, Hospital, HospitalId, Rating, Specialization};
    use crate::search::engine::SearchEngine;
    use crate::search::ranker::{Candidate, compare, compare_relevance, viability};
    use crate::search::scorer::score;
    use crate::search::tokenizer::{effective_queries, tokenize_query};
    use crate::search::types::{
        PageLimits, Position, SearchParams, SearchRequest, SearchResponse, SortMode,
    };
    use crate::store::{MemoryStore, Store};
    use crate::store::filter::SortDirection;

    const LIMITS: PageLimits = PageLimits {
        default_page_size: 10,
        max_page_size: 50,
    };

    fn params(pairs: &[(&str, &str)]) -> SearchParams {
        let mut p = SearchParams::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match *key {
                "q" => p.q = value,
                "lat" => p.lat = value,
                "lon" => p.lon = value,
                "specialization" => p.specialization = value,
                "min_rating" => p.min_rating = value,
                "bed_type" => p.bed_type = value,
                "sort" => p.sort = value,
                "direction" => p.direction = value,
                "page" => p.page = value,
                "page_size" => p.page_size = value,
                other => panic!("unknown param {}", other),
            }
        }
        p
    }

    fn request(pairs: &[(&str, &str)]) -> SearchRequest {
        SearchRequest::parse(&params(pairs), LIMITS).unwrap()
    }

    /// Offset in degrees of latitude for a distance in km along a meridian.
    fn north_of_user(km: f64) -> f64 {
        12.90 + km / 111.195
    }

    fn apollo() -> Hospital {
        let mut h = with_beds(hospital("h-apollo", "Apollo"), 0, 5, 0);
        h.diagnostics.mri = Some(Capability::Detail {
            available: true,
            notes: None,
        });
        h.specializations.push(Specialization {
            department: "Cardiology".to_string(),
            key_equipment: vec![],
        });
        h
    }

    // ============================================================
    // TOKENIZER TESTS
    // ============================================================

    #[test]
    fn test_effective_queries_include_raw_and_tokens() {
        let queries = effective_queries("  Cardiac MRI ");

        assert_eq!(queries, vec!["cardiac mri", "cardiac", "mri"]);
    }

    #[test]
    fn test_tokens_strip_punctuation_and_short_words() {
        assert_eq!(tokenize_query("icu, a (oxygen)!"), vec!["icu", "oxygen"]);
    }

    #[test]
    fn test_synonym_variant_added() {
        let queries = effective_queries("heart");

        assert!(queries.contains(&"heart".to_string()));
        assert!(queries.contains(&"cardio".to_string()));
    }

    #[test]
    fn test_o2_and_oxygen_expand_to_each_other() {
        assert!(effective_queries("o2").contains(&"oxygen".to_string()));
        assert!(effective_queries("oxygen").contains(&"o2".to_string()));
    }

    #[test]
    fn test_blank_query_has_no_effective_set() {
        assert!(effective_queries("   ").is_empty());
    }

    // ============================================================
    // SCORING TESTS
    // ============================================================

    #[test]
    fn test_cardiac_mri_scores_diagnostics_only() {
        // "cardiac" is not a substring of "cardiology", so only the MRI flag counts
        let queries = effective_queries("cardiac mri");

        assert_eq!(score(&queries, &apollo()), 50);
    }

    #[test]
    fn test_name_and_city_weights_add_up() {
        let h = hospital("h-1", "Bangalore Baptist");
        let queries = effective_queries("bangalore");

        // name +100, city +60
        assert_eq!(score(&queries, &h), 160);
    }

    #[test]
    fn test_o2_and_oxygen_both_match_oxygen_capability() {
        let mut h = hospital("h-1", "Plain");
        h.diagnostics.custom.push("oxygen".to_string());

        assert!(score(&effective_queries("o2"), &h) >= 50);
        assert!(score(&effective_queries("oxygen"), &h) >= 50);
    }

    #[test]
    fn test_adding_matching_specialization_never_decreases_score() {
        let mut h = hospital("h-1", "Plain");
        let queries = effective_queries("neurology");
        let before = score(&queries, &h);

        h.specializations.push(Specialization {
            department: "Neurology".to_string(),
            key_equipment: vec!["EEG".to_string()],
        });

        assert!(score(&queries, &h) >= before);
        assert_eq!(score(&queries, &h), before + 70);
    }

    #[test]
    fn test_resource_bonus_requires_free_beds() {
        let empty = hospital("h-1", "Plain");
        let with_icu = with_beds(hospital("h-2", "Plain"), 0, 2, 0);
        let queries = effective_queries("icu");

        assert_eq!(score(&queries, &empty), 0);
        assert_eq!(score(&queries, &with_icu), 40);
    }

    #[test]
    fn test_ventilator_bonus_uses_capability_flag() {
        let mut h = hospital("h-1", "Plain");
        h.critical_care.ventilator = Some(Capability::Flag(true));

        // critical care match +50 plus ventilator bonus +40
        assert_eq!(score(&effective_queries("ventilator"), &h), 90);
    }

    #[test]
    fn test_unavailable_capability_does_not_match() {
        let mut h = hospital("h-1", "Plain");
        h.diagnostics.mri = Some(Capability::Flag(false));

        assert_eq!(score(&effective_queries("mri"), &h), 0);
    }

    // ============================================================
    // RANKING TESTS
    // ============================================================

    #[test]
    fn test_viability_scenario() {
        assert_eq!(viability(10, Some(2.0)), 90.0);
        assert_eq!(viability(0, Some(1.0)), -1001.0);
        assert_eq!(viability(3, None), 30.0);
    }

    #[test]
    fn test_zero_capacity_ranks_below_any_free_bed() {
        let far_one_bed = Candidate::new(with_beds(hospital("h-1", "A"), 1, 0, 0), Some(150.0), 0);
        let near_empty = Candidate::new(hospital("h-2", "B"), Some(0.1), 0);

        let ordering = compare(SortMode::Availability, SortDirection::Desc, &far_one_bed, &near_empty);

        assert_eq!(ordering, std::cmp::Ordering::Less);
    }

    #[test]
    fn test_equal_beds_nearer_ranks_higher() {
        let near = Candidate::new(with_beds(hospital("h-2", "A"), 4, 0, 0), Some(1.0), 0);
        let far = Candidate::new(with_beds(hospital("h-1", "B"), 4, 0, 0), Some(3.0), 0);
        let mut ranked = vec![far, near];

        ranked.sort_by(|a, b| compare(SortMode::Availability, SortDirection::Desc, a, b));

        assert_eq!(ranked[0].hospital.id.0, "h-2");
    }

    #[test]
    fn test_relevance_ties_break_by_name_without_position() {
        let a = Candidate::new(hospital("h-2", "alpha"), None, 100);
        let b = Candidate::new(hospital("h-1", "Beta"), None, 100);
        let c = Candidate::new(hospital("h-3", "Gamma"), None, 160);
        let mut ranked = vec![b, a, c];

        ranked.sort_by(compare_relevance);

        let names: Vec<_> = ranked.iter().map(|c| c.hospital.name.as_str()).collect();
        assert_eq!(names, vec!["Gamma", "alpha", "Beta"]);
    }

    // ============================================================
    // PARSING TESTS
    // ============================================================

    #[test]
    fn test_defaults() {
        let req = request(&[]);

        assert_eq!(req.page, 1);
        assert_eq!(req.page_size, 10);
        assert_eq!(req.effective_sort(), Some(SortMode::Availability));
        assert_eq!(req.direction_for(SortMode::Availability), SortDirection::Desc);
        assert_eq!(req.filter.verified, Some(true));
    }

    #[test]
    fn test_default_directions_per_mode() {
        let req = request(&[]);

        assert_eq!(req.direction_for(SortMode::Distance), SortDirection::Asc);
        assert_eq!(req.direction_for(SortMode::Rating), SortDirection::Desc);
        assert_eq!(req.direction_for(SortMode::Name), SortDirection::Asc);
    }

    #[test]
    fn test_distance_sort_without_position_falls_back() {
        assert_eq!(
            request(&[("sort", "distance")]).effective_sort(),
            Some(SortMode::Availability)
        );
        assert_eq!(
            request(&[("sort", "distance"), ("lat", "12.9"), ("lon", "77.6")]).effective_sort(),
            Some(SortMode::Distance)
        );
    }

    #[test]
    fn test_query_mode_defaults_to_relevance() {
        assert_eq!(request(&[("q", "icu")]).effective_sort(), None);
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let cases: &[&[(&str, &str)]] = &[
            &[("lat", "12.9")],
            &[("lat", "91"), ("lon", "77.6")],
            &[("lat", "north"), ("lon", "77.6")],
            &[("page", "0")],
            &[("page", "9223372036854775807")],
            &[("page_size", "51")],
            &[("page_size", "0")],
            &[("min_rating", "6")],
            &[("sort", "popularity")],
            &[("bed_type", "maternity")],
            &[("direction", "up")],
        ];

        for case in cases {
            let result = SearchRequest::parse(&params(case), LIMITS);
            assert!(
                matches!(result, Err(AppError::Validation(_))),
                "expected validation error for {:?}",
                case
            );
        }
    }

    #[test]
    fn test_position_parse() {
        let position = Position::parse(Some("12.9"), Some(" 77.6 ")).unwrap();
        assert_eq!(position, Some(Position { lat: 12.9, lon: 77.6 }));
        assert_eq!(Position::parse(None, Some("")).unwrap(), None);
    }

    // ============================================================
    // PIPELINE TESTS
    // ============================================================

    async fn engine_with(hospitals: Vec<Hospital>) -> SearchEngine {
        let store = store_with(hospitals).await;
        SearchEngine::new(store, LIMITS)
    }

    #[tokio::test]
    async fn test_unverified_never_returned() {
        let mut hidden = with_beds(hospital("h-2", "Hidden ICU Centre"), 9, 9, 9);
        hidden.is_verified = false;
        let engine = engine_with(vec![with_beds(hospital("h-1", "ICU Care"), 1, 1, 0), hidden]).await;

        for req in [request(&[]), request(&[("q", "icu")]), request(&[("sort", "name")])] {
            let response = engine.search(&req).await.unwrap();
            assert!(response.results.iter().all(|r| r.id.0 != "h-2"));
            assert_eq!(response.total_count, 1);
        }
    }

    #[tokio::test]
    async fn test_viability_order_from_user_position() {
        let mut a = with_beds(hospital("h-a", "A"), 10, 0, 0);
        a.latitude = north_of_user(2.0);
        let mut b = hospital("h-b", "B");
        b.latitude = north_of_user(1.0);
        let engine = engine_with(vec![b, a]).await;

        let response = engine
            .search(&request(&[("lat", "12.90"), ("lon", "77.60")]))
            .await
            .unwrap();

        assert_eq!(response.results[0].id.0, "h-a");
        let top = response.results[0].viability.unwrap();
        let bottom = response.results[1].viability.unwrap();
        assert!((top - 90.0).abs() < 0.1, "got {}", top);
        assert!((bottom + 1001.0).abs() < 0.1, "got {}", bottom);
        assert_eq!(response.results[0].distance_km, Some(2.0));
    }

    #[tokio::test]
    async fn test_query_mode_drops_zero_scores_and_reports_relevance() {
        let engine = engine_with(vec![apollo(), hospital("h-2", "Plain")]).await;

        let response = engine.search(&request(&[("q", "cardiac mri")])).await.unwrap();

        assert_eq!(response.total_count, 1);
        assert_eq!(response.results[0].relevance, Some(50));
        assert!(response.results[0].viability.is_none());
    }

    #[tokio::test]
    async fn test_pagination_counts_before_slicing() {
        let hospitals = (0..7)
            .map(|i| with_beds(hospital(&format!("h-{}", i), &format!("H{}", i)), i, 0, 0))
            .collect();
        let engine = engine_with(hospitals).await;

        let response = engine
            .search(&request(&[("page", "3"), ("page_size", "3")]))
            .await
            .unwrap();

        assert_eq!(response.total_count, 7);
        assert_eq!(response.total_pages, 3);
        assert_eq!(response.results.len(), 1);
        // Least free beds last
        assert_eq!(response.results[0].id.0, "h-0");
    }

    #[tokio::test]
    async fn test_name_sort_is_pushed_down() {
        let engine = engine_with(vec![
            hospital("h-1", "Charlie"),
            hospital("h-2", "Alpha"),
            hospital("h-3", "Bravo"),
        ])
        .await;

        let response = engine
            .search(&request(&[("sort", "name"), ("direction", "desc"), ("page_size", "2")]))
            .await
            .unwrap();

        let names: Vec<_> = response.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Charlie", "Bravo"]);
        assert_eq!(response.total_pages, 2);
    }

    async fn rate(store: &MemoryStore, user: &str, hospital_id: &str, value: u8) {
        store
            .upsert_rating(Rating {
                user_id: UserId(user.to_string()),
                hospital_id: HospitalId(hospital_id.to_string()),
                value,
                comment: None,
                created_at: at(0),
                updated_at: at(0),
            })
            .await
            .unwrap();
    }

    fn ids(response: &SearchResponse) -> Vec<&str> {
        response.results.iter().map(|r| r.id.0.as_str()).collect()
    }

    #[tokio::test]
    async fn test_distance_sort_ignores_capacity() {
        let mut far = with_beds(hospital("h-far", "Far"), 50, 0, 0);
        far.latitude = north_of_user(5.0);
        let mut near = hospital("h-near", "Near");
        near.latitude = north_of_user(1.0);
        let mut middle = with_beds(hospital("h-mid", "Middle"), 1, 0, 0);
        middle.latitude = north_of_user(3.0);
        let engine = engine_with(vec![far, near, middle]).await;
        let position = [("lat", "12.90"), ("lon", "77.60")];

        let asc = engine
            .search(&request(&[position[0], position[1], ("sort", "distance")]))
            .await
            .unwrap();
        let desc = engine
            .search(&request(&[
                position[0],
                position[1],
                ("sort", "distance"),
                ("direction", "desc"),
            ]))
            .await
            .unwrap();

        assert_eq!(ids(&asc), vec!["h-near", "h-mid", "h-far"]);
        assert_eq!(ids(&desc), vec!["h-far", "h-mid", "h-near"]);
        assert_eq!(asc.total_count, 3);
    }

    #[tokio::test]
    async fn test_rating_sort_is_pushed_down_both_directions() {
        let store = store_with(vec![
            hospital("h-1", "Three"),
            hospital("h-2", "Five"),
            hospital("h-3", "Unrated"),
        ])
        .await;
        rate(&store, "u-1", "h-1", 3).await;
        rate(&store, "u-1", "h-2", 5).await;
        let engine = SearchEngine::new(store, LIMITS);

        let desc = engine.search(&request(&[("sort", "rating")])).await.unwrap();
        let asc = engine
            .search(&request(&[("sort", "rating"), ("direction", "asc")]))
            .await
            .unwrap();
        let second_page = engine
            .search(&request(&[("sort", "rating"), ("page", "2"), ("page_size", "2")]))
            .await
            .unwrap();

        assert_eq!(ids(&desc), vec!["h-2", "h-1", "h-3"]);
        assert_eq!(ids(&asc), vec!["h-3", "h-1", "h-2"]);
        assert_eq!(ids(&second_page), vec!["h-3"]);
        assert_eq!(second_page.total_count, 3);
        assert_eq!(second_page.total_pages, 2);
    }

    #[tokio::test]
    async fn test_filters_combine_with_pagination() {
        let cardiology = |id: &str, department: &str, icu: u32| {
            let mut h = with_beds(hospital(id, id), 0, icu, 0);
            h.specializations.push(Specialization {
                department: department.to_string(),
                key_equipment: vec![],
            });
            h
        };
        let store = store_with(vec![
            cardiology("h-1", "Cardiology", 1),
            cardiology("h-2", "Cardiology", 2),
            cardiology("h-3", "Cardiology", 3),
            cardiology("h-4", "Cardiology", 0),
            cardiology("h-5", "Neurology", 5),
            cardiology("h-6", "Interventional Cardiology", 4),
        ])
        .await;
        for (id, value) in [("h-1", 5), ("h-2", 4), ("h-3", 2), ("h-4", 5), ("h-5", 5)] {
            rate(&store, "u-1", id, value).await;
        }
        rate(&store, "u-1", "h-6", 5).await;
        rate(&store, "u-2", "h-6", 4).await;
        let engine = SearchEngine::new(store, LIMITS);
        let filters = [("specialization", "CARDIO"), ("bed_type", "icu"), ("min_rating", "3")];

        let first = engine
            .search(&request(&[filters[0], filters[1], filters[2], ("page_size", "2")]))
            .await
            .unwrap();
        let second = engine
            .search(&request(&[
                filters[0],
                filters[1],
                filters[2],
                ("page_size", "2"),
                ("page", "2"),
            ]))
            .await
            .unwrap();

        // Most free ICU beds first among the three survivors
        assert_eq!(ids(&first), vec!["h-6", "h-2"]);
        assert_eq!(ids(&second), vec!["h-1"]);
        assert_eq!(first.total_count, 3);
        assert_eq!(second.total_pages, 2);
    }

    #[tokio::test]
    async fn test_enrichment_folds_ratings_and_defaults_wait_times() {
        let store = store_with(vec![with_beds(hospital("h-1", "A"), 1, 2, 3)]).await;
        for (user, value) in [("u-1", 5), ("u-2", 4)] {
            store
                .upsert_rating(Rating {
                    user_id: UserId(user.to_string()),
                    hospital_id: HospitalId("h-1".into()),
                    value,
                    comment: None,
                    created_at: at(0),
                    updated_at: at(0),
                })
                .await
                .unwrap();
        }
        let engine = SearchEngine::new(store, LIMITS);

        let response = engine.search(&request(&[])).await.unwrap();
        let card = &response.results[0];

        assert_eq!(card.total_free_beds, 6);
        assert_eq!(card.average_rating, 4.5);
        assert_eq!(card.rating_count, 2);
        assert_eq!(card.distance_km, None);
        let json = serde_json::to_value(&card.er_wait_times).unwrap();
        assert_eq!(json["critical"], "Available");
    }

    #[tokio::test]
    async fn test_store_outage_is_dependency_error() {
        let store = store_with(vec![hospital("h-1", "A")]).await;
        store.set_available(false);
        let engine = SearchEngine::new(store, LIMITS);

        let result = engine.search(&request(&[])).await;

        assert!(matches!(result, Err(AppError::Dependency(_))));
    }

    #[tokio::test]
    async fn test_detail_hides_unverified() {
        let mut hidden = hospital("h-2", "Hidden");
        hidden.is_verified = false;
        let engine = engine_with(vec![hospital("h-1", "Shown"), hidden]).await;

        assert!(engine.detail(&HospitalId("h-1".into()), None).await.is_ok());
        assert!(matches!(
            engine.detail(&HospitalId("h-2".into()), None).await,
            Err(AppError::NotFound(_))
        ));
    }

    // ============================================================
    // SUGGEST TESTS
    // ============================================================

    #[tokio::test]
    async fn test_suggest_caps_each_category() {
        let hospitals = (0..5)
            .map(|i| {
                let mut h = hospital(&format!("h-{}", i), &format!("City Care {}", i));
                h.specializations.push(Specialization {
                    department: format!("Cardiology {}", i),
                    key_equipment: vec![],
                });
                h
            })
            .collect();
        let engine = engine_with(hospitals).await;

        let names = engine.suggest("care").await.unwrap();
        let departments = engine.suggest("cardio").await.unwrap();

        assert_eq!(names.hospital_names.len(), 3);
        assert_eq!(departments.specializations.len(), 3);
    }

    #[tokio::test]
    async fn test_suggest_facilities_and_bed_types() {
        let mut h = hospital("h-1", "A");
        h.critical_care.icu = Some(Capability::Flag(true));
        let engine = engine_with(vec![h]).await;

        let suggestions = engine.suggest("ICU").await.unwrap();

        assert_eq!(suggestions.facilities, vec!["icu"]);
        assert_eq!(suggestions.bed_types, vec!["ICU Beds"]);
    }

    #[tokio::test]
    async fn test_suggest_blank_is_empty() {
        let engine = engine_with(vec![hospital("h-1", "A")]).await;

        let suggestions = engine.suggest("  ").await.unwrap();

        assert!(suggestions.hospital_names.is_empty());
        assert!(suggestions.bed_types.is_empty());
    }
}

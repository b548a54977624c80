use std::collections::BTreeSet;

use super::engine::SearchEngine;
use super::tokenizer::normalize;
use super::types::Suggestions;
use crate::error::AppError;
use crate::hospital::types::{BedType, CapabilitySet};
use crate::store::filter::HospitalFilter;

pub const MAX_PER_CATEGORY: usize = 3;

fn capped(set: BTreeSet<String>) -> Vec<String> {
    set.into_iter().take(MAX_PER_CATEGORY).collect()
}

impl SearchEngine {
    /// Autocomplete over verified hospitals: names, departments, available facilities and bed
    /// types containing `partial`, each list capped at three entries.
    pub async fn suggest(&self, partial: &str) -> Result<Suggestions, AppError> {
        let needle = normalize(partial);
        if needle.is_empty() {
            return Ok(Suggestions::default());
        }
        let hit = |text: &str| text.to_lowercase().contains(&needle);

        let hospitals = self
            .store
            .find_hospitals(&HospitalFilter::patient_facing(), None, None)
            .await?;

        let mut names = BTreeSet::new();
        let mut departments = BTreeSet::new();
        let mut facilities = BTreeSet::new();
        for hospital in &hospitals {
            if hit(&hospital.name) {
                names.insert(hospital.name.clone());
            }
            for specialization in &hospital.specializations {
                if hit(&specialization.department) {
                    departments.insert(specialization.department.clone());
                }
            }
            let labels = hospital
                .diagnostics
                .available_labels()
                .into_iter()
                .chain(hospital.critical_care.available_labels())
                .chain(hospital.support_services.available_labels());
            for label in labels {
                if hit(label) {
                    facilities.insert(label.to_string());
                }
            }
        }

        let bed_types = BedType::ALL
            .iter()
            .filter(|b| hit(b.label()) || hit(b.as_str()))
            .map(|b| b.label().to_string())
            .take(MAX_PER_CATEGORY)
            .collect();

        Ok(Suggestions {
            hospital_names: capped(names),
            specializations: capped(departments),
            facilities: capped(facilities),
            bed_types,
        })
    }
}

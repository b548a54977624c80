use crate::hospital::types::{CapabilitySet, Hospital};

pub const NAME_WEIGHT: u32 = 100;
pub const CITY_WEIGHT: u32 = 60;
pub const ADDRESS_WEIGHT: u32 = 50;
pub const SPECIALIZATION_WEIGHT: u32 = 70;
pub const DIAGNOSTICS_WEIGHT: u32 = 50;
pub const CRITICAL_CARE_WEIGHT: u32 = 50;
pub const SUPPORT_WEIGHT: u32 = 30;
/// Added when the query asks for a resource the hospital currently has.
pub const RESOURCE_BONUS: u32 = 40;

/// Query-in-field: some effective query string occurs inside the field.
fn field_matches(queries: &[String], field: &str) -> bool {
    let field = field.to_lowercase();
    queries.iter().any(|q| field.contains(q.as_str()))
}

fn mentions(queries: &[String], keywords: &[&str]) -> bool {
    queries
        .iter()
        .any(|q| keywords.iter().any(|keyword| q.contains(keyword)))
}

fn capability_matches(queries: &[String], set: &impl CapabilitySet) -> bool {
    set.available_labels()
        .into_iter()
        .any(|label| field_matches(queries, label))
}

/// Relevance of `hospital` to the effective query set. Zero means no match.
///
/// Checks are independent and additive.
pub fn score(queries: &[String], hospital: &Hospital) -> u32 {
    if queries.is_empty() {
        return 0;
    }

    let mut score = 0;

    if field_matches(queries, &hospital.name) {
        score += NAME_WEIGHT;
    }
    if field_matches(queries, &hospital.city) {
        score += CITY_WEIGHT;
    }
    if field_matches(queries, &hospital.address) {
        score += ADDRESS_WEIGHT;
    }

    let specialization_hit = hospital.specializations.iter().any(|s| {
        field_matches(queries, &s.department)
            || s.key_equipment.iter().any(|e| field_matches(queries, e))
    });
    if specialization_hit {
        score += SPECIALIZATION_WEIGHT;
    }

    if capability_matches(queries, &hospital.diagnostics) {
        score += DIAGNOSTICS_WEIGHT;
    }
    if capability_matches(queries, &hospital.critical_care) {
        score += CRITICAL_CARE_WEIGHT;
    }
    if capability_matches(queries, &hospital.support_services) {
        score += SUPPORT_WEIGHT;
    }

    let beds = &hospital.beds;
    if mentions(queries, &["icu", "intensive"]) && beds.icu > 0 {
        score += RESOURCE_BONUS;
    }
    if mentions(queries, &["ventilator"]) && hospital.critical_care.has_ventilator() {
        score += RESOURCE_BONUS;
    }
    if mentions(queries, &["oxygen", "o2"]) && beds.oxygen > 0 {
        score += RESOURCE_BONUS;
    }
    if mentions(queries, &["general", "ward"]) && beds.general > 0 {
        score += RESOURCE_BONUS;
    }

    score
}

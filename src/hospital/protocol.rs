use serde::{Deserialize, Serialize};

use super::types::{
    BedCounts, CriticalCare, Diagnostics, Hospital, Rating, RatingSummary, Specialization,
    SupportServices, UserAccount,
};

/// Self-service signup: the staff account and the hospital it administers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterHospitalRequest {
    pub email: String,
    pub display_name: String,
    pub name: String,
    pub address: String,
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub pincode: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub beds: BedCounts,
    #[serde(default)]
    pub specializations: Vec<Specialization>,
    #[serde(default)]
    pub diagnostics: Diagnostics,
    #[serde(default)]
    pub critical_care: CriticalCare,
    #[serde(default)]
    pub support_services: SupportServices,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterHospitalResponse {
    pub account: UserAccount,
    pub hospital: Hospital,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRatingRequest {
    /// Signed so that out-of-range input reaches validation instead of failing to parse.
    pub value: i64,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingResponse {
    pub rating: Rating,
    pub summary: RatingSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationRequest {
    pub verified: bool,
}

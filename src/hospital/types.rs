use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::actor::UserId;

/// Maximum number of free-form capability names a hospital may add per attribute bag.
pub const MAX_CUSTOM_CAPABILITIES: usize = 20;
/// Maximum length of one free-form capability name.
pub const MAX_CAPABILITY_LEN: usize = 64;
/// Upper bound on any single bed counter.
pub const MAX_BEDS_PER_TYPE: u32 = 1_000_000;

/// Unique identifier of a hospital. Wrapper around a UUID string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HospitalId(pub String);

impl HospitalId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for HospitalId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HospitalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Patient/staff supplied urgency tier. Never computed from symptoms.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Moderate,
    Critical,
}

impl Severity {
    /// Higher is more urgent.
    pub fn urgency(&self) -> u8 {
        match self {
            Severity::Low => 0,
            Severity::Moderate => 1,
            Severity::Critical => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Moderate => "MODERATE",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BedType {
    General,
    Icu,
    Oxygen,
}

impl BedType {
    pub const ALL: [BedType; 3] = [BedType::General, BedType::Icu, BedType::Oxygen];

    pub fn as_str(&self) -> &'static str {
        match self {
            BedType::General => "general",
            BedType::Icu => "icu",
            BedType::Oxygen => "oxygen",
        }
    }

    /// Human label offered by autocomplete.
    pub fn label(&self) -> &'static str {
        match self {
            BedType::General => "General Beds",
            BedType::Icu => "ICU Beds",
            BedType::Oxygen => "Oxygen Beds",
        }
    }
}

impl FromStr for BedType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "general" => Ok(BedType::General),
            "icu" => Ok(BedType::Icu),
            "oxygen" => Ok(BedType::Oxygen),
            other => Err(format!("unknown bed type '{}'", other)),
        }
    }
}

/// Free bed counters. Unsigned, so they can never be negative.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BedCounts {
    pub general: u32,
    pub icu: u32,
    pub oxygen: u32,
}

impl BedCounts {
    /// Saturates instead of wrapping for records that bypassed `validate`.
    pub fn total(&self) -> u32 {
        self.general
            .saturating_add(self.icu)
            .saturating_add(self.oxygen)
    }

    pub fn validate(&self) -> Result<(), String> {
        for bed_type in [BedType::General, BedType::Icu, BedType::Oxygen] {
            if self.get(bed_type) > MAX_BEDS_PER_TYPE {
                return Err(format!(
                    "{} beds must be at most {}",
                    bed_type.as_str(),
                    MAX_BEDS_PER_TYPE
                ));
            }
        }
        Ok(())
    }

    pub fn get(&self, bed_type: BedType) -> u32 {
        match bed_type {
            BedType::General => self.general,
            BedType::Icu => self.icu,
            BedType::Oxygen => self.oxygen,
        }
    }

    /// Computes the counters after applying `update`.
    ///
    /// Fails without side effects if any counter would drop below zero or overflow.
    pub fn apply(&self, update: &InventoryUpdate) -> Result<BedCounts, String> {
        Ok(BedCounts {
            general: apply_change(self.general, update.general, BedType::General)?,
            icu: apply_change(self.icu, update.icu, BedType::Icu)?,
            oxygen: apply_change(self.oxygen, update.oxygen, BedType::Oxygen)?,
        })
    }
}

fn apply_change(current: u32, change: Option<BedChange>, bed_type: BedType) -> Result<u32, String> {
    let next = match change {
        None => return Ok(current),
        Some(BedChange::Set(value)) => value,
        Some(BedChange::Delta(delta)) => (current as i64)
            .checked_add(delta)
            .ok_or_else(|| format!("{} bed count out of range", bed_type.as_str()))?,
    };
    if next < 0 {
        return Err(format!("{} beds cannot go below zero", bed_type.as_str()));
    }
    if next > MAX_BEDS_PER_TYPE as i64 {
        return Err(format!(
            "{} beds must be at most {}",
            bed_type.as_str(),
            MAX_BEDS_PER_TYPE
        ));
    }
    Ok(next as u32)
}

/// One staff-side change to a bed counter: an absolute value or a relative adjustment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BedChange {
    Set(i64),
    Delta(i64),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InventoryUpdate {
    #[serde(default)]
    pub general: Option<BedChange>,
    #[serde(default)]
    pub icu: Option<BedChange>,
    #[serde(default)]
    pub oxygen: Option<BedChange>,
}

impl InventoryUpdate {
    pub fn is_empty(&self) -> bool {
        self.general.is_none() && self.icu.is_none() && self.oxygen.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Specialization {
    pub department: String,
    #[serde(default)]
    pub key_equipment: Vec<String>,
}

/// A facility capability: either a bare flag or a flag with free-text detail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Capability {
    Flag(bool),
    Detail {
        available: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        notes: Option<String>,
    },
}

impl Capability {
    pub fn is_available(&self) -> bool {
        match self {
            Capability::Flag(available) => *available,
            Capability::Detail { available, .. } => *available,
        }
    }
}

fn available(capability: &Option<Capability>) -> bool {
    capability.as_ref().is_some_and(Capability::is_available)
}

/// Common view over the typed attribute bags, used by scoring and suggestions.
pub trait CapabilitySet {
    /// Every known capability as `(label, available)`, plus custom names (always available).
    fn entries(&self) -> Vec<(&str, bool)>;

    fn custom(&self) -> &[String];

    fn available_labels(&self) -> Vec<&str> {
        self.entries()
            .into_iter()
            .filter(|(_, available)| *available)
            .map(|(label, _)| label)
            .collect()
    }

    fn validate(&self, bag: &str) -> Result<(), String> {
        let custom = self.custom();
        if custom.len() > MAX_CUSTOM_CAPABILITIES {
            return Err(format!(
                "{} may list at most {} custom entries",
                bag, MAX_CUSTOM_CAPABILITIES
            ));
        }
        if let Some(name) = custom
            .iter()
            .find(|name| name.trim().is_empty() || name.len() > MAX_CAPABILITY_LEN)
        {
            return Err(format!("{} has an invalid custom entry '{}'", bag, name));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Diagnostics {
    #[serde(default)]
    pub mri: Option<Capability>,
    #[serde(default)]
    pub ct_scan: Option<Capability>,
    #[serde(default)]
    pub x_ray: Option<Capability>,
    #[serde(default)]
    pub ultrasound: Option<Capability>,
    #[serde(default)]
    pub pathology: Option<Capability>,
    #[serde(default)]
    pub ecg: Option<Capability>,
    #[serde(default)]
    pub custom: Vec<String>,
}

impl Diagnostics {
    pub const LABELS: [&'static str; 6] = ["mri", "ct scan", "x-ray", "ultrasound", "pathology", "ecg"];
}

impl CapabilitySet for Diagnostics {
    fn entries(&self) -> Vec<(&str, bool)> {
        let mut entries = vec![
            ("mri", available(&self.mri)),
            ("ct scan", available(&self.ct_scan)),
            ("x-ray", available(&self.x_ray)),
            ("ultrasound", available(&self.ultrasound)),
            ("pathology", available(&self.pathology)),
            ("ecg", available(&self.ecg)),
        ];
        entries.extend(self.custom.iter().map(|name| (name.as_str(), true)));
        entries
    }

    fn custom(&self) -> &[String] {
        &self.custom
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CriticalCare {
    #[serde(default)]
    pub icu: Option<Capability>,
    #[serde(default)]
    pub nicu: Option<Capability>,
    #[serde(default)]
    pub ventilator: Option<Capability>,
    #[serde(default)]
    pub dialysis: Option<Capability>,
    #[serde(default)]
    pub cath_lab: Option<Capability>,
    #[serde(default)]
    pub trauma_center: Option<Capability>,
    #[serde(default)]
    pub custom: Vec<String>,
}

impl CriticalCare {
    pub const LABELS: [&'static str; 6] = [
        "icu",
        "nicu",
        "ventilator",
        "dialysis",
        "cath lab",
        "trauma center",
    ];

    pub fn has_ventilator(&self) -> bool {
        available(&self.ventilator)
    }
}

impl CapabilitySet for CriticalCare {
    fn entries(&self) -> Vec<(&str, bool)> {
        let mut entries = vec![
            ("icu", available(&self.icu)),
            ("nicu", available(&self.nicu)),
            ("ventilator", available(&self.ventilator)),
            ("dialysis", available(&self.dialysis)),
            ("cath lab", available(&self.cath_lab)),
            ("trauma center", available(&self.trauma_center)),
        ];
        entries.extend(self.custom.iter().map(|name| (name.as_str(), true)));
        entries
    }

    fn custom(&self) -> &[String] {
        &self.custom
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SupportServices {
    #[serde(default)]
    pub ambulance: Option<Capability>,
    #[serde(default)]
    pub pharmacy: Option<Capability>,
    #[serde(default)]
    pub blood_bank: Option<Capability>,
    #[serde(default)]
    pub cafeteria: Option<Capability>,
    #[serde(default)]
    pub parking: Option<Capability>,
    #[serde(default)]
    pub wheelchair: Option<Capability>,
    #[serde(default)]
    pub custom: Vec<String>,
}

impl SupportServices {
    pub const LABELS: [&'static str; 6] = [
        "ambulance",
        "pharmacy",
        "blood bank",
        "cafeteria",
        "parking",
        "wheelchair",
    ];
}

impl CapabilitySet for SupportServices {
    fn entries(&self) -> Vec<(&str, bool)> {
        let mut entries = vec![
            ("ambulance", available(&self.ambulance)),
            ("pharmacy", available(&self.pharmacy)),
            ("blood bank", available(&self.blood_bank)),
            ("cafeteria", available(&self.cafeteria)),
            ("parking", available(&self.parking)),
            ("wheelchair", available(&self.wheelchair)),
        ];
        entries.extend(self.custom.iter().map(|name| (name.as_str(), true)));
        entries
    }

    fn custom(&self) -> &[String] {
        &self.custom
    }
}

/// Wait reported by the ER for one severity tier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WaitTier {
    pub average_wait_minutes: u32,
    pub current_queue_length: u32,
    pub last_updated: DateTime<Utc>,
}

/// Stored ER snapshot; a tier stays `None` until staff first report it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ErWaitTimes {
    #[serde(default)]
    pub critical: Option<WaitTier>,
    #[serde(default)]
    pub moderate: Option<WaitTier>,
    #[serde(default)]
    pub low: Option<WaitTier>,
}

impl ErWaitTimes {
    /// Applies a staff report on top of the current snapshot. Unreported tiers are kept.
    pub fn merged(current: Option<&ErWaitTimes>, update: &ErWaitUpdate, now: DateTime<Utc>) -> ErWaitTimes {
        let mut next = current.cloned().unwrap_or_default();
        let tiers = [
            (&mut next.critical, update.critical),
            (&mut next.moderate, update.moderate),
            (&mut next.low, update.low),
        ];
        for (slot, report) in tiers {
            if let Some(report) = report {
                *slot = Some(WaitTier {
                    average_wait_minutes: report.average_wait_minutes as u32,
                    current_queue_length: report.current_queue_length as u32,
                    last_updated: now,
                });
            }
        }
        next
    }
}

/// Upper bound accepted for a reported wait, one week.
pub const MAX_WAIT_MINUTES: i64 = 7 * 24 * 60;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TierReport {
    pub average_wait_minutes: i64,
    pub current_queue_length: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ErWaitUpdate {
    #[serde(default)]
    pub critical: Option<TierReport>,
    #[serde(default)]
    pub moderate: Option<TierReport>,
    #[serde(default)]
    pub low: Option<TierReport>,
}

impl ErWaitUpdate {
    pub fn validate(&self) -> Result<(), String> {
        let tiers = [
            (Severity::Critical, self.critical),
            (Severity::Moderate, self.moderate),
            (Severity::Low, self.low),
        ];
        if tiers.iter().all(|(_, report)| report.is_none()) {
            return Err("at least one severity tier must be reported".to_string());
        }
        for (severity, report) in tiers {
            let Some(report) = report else { continue };
            if !(0..=MAX_WAIT_MINUTES).contains(&report.average_wait_minutes) {
                return Err(format!("{} average wait is out of range", severity));
            }
            if !(0..=u32::MAX as i64).contains(&report.current_queue_length) {
                return Err(format!("{} queue length is out of range", severity));
            }
        }
        Ok(())
    }
}

/// One tier of the public ER view: the reported numbers, or the literal `"Available"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TierSnapshot {
    Reported(WaitTier),
    Status(String),
}

impl TierSnapshot {
    pub fn available() -> Self {
        TierSnapshot::Status("Available".to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErWaitSnapshot {
    pub critical: TierSnapshot,
    pub moderate: TierSnapshot,
    pub low: TierSnapshot,
}

impl From<Option<&ErWaitTimes>> for ErWaitSnapshot {
    fn from(times: Option<&ErWaitTimes>) -> Self {
        let tier = |t: Option<&WaitTier>| match t {
            Some(t) => TierSnapshot::Reported(t.clone()),
            None => TierSnapshot::available(),
        };
        match times {
            Some(times) => ErWaitSnapshot {
                critical: tier(times.critical.as_ref()),
                moderate: tier(times.moderate.as_ref()),
                low: tier(times.low.as_ref()),
            },
            None => ErWaitSnapshot {
                critical: TierSnapshot::available(),
                moderate: TierSnapshot::available(),
                low: TierSnapshot::available(),
            },
        }
    }
}

/// Denormalized rating aggregate kept on the hospital row.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct RatingSummary {
    pub average: f64,
    pub count: u32,
}

impl RatingSummary {
    /// Folds rating values into an average rounded to one decimal (0 when empty).
    pub fn fold<I: IntoIterator<Item = u8>>(values: I) -> Self {
        let (sum, count) = values
            .into_iter()
            .fold((0u64, 0u32), |(sum, count), v| (sum + v as u64, count + 1));
        if count == 0 {
            return RatingSummary::default();
        }
        let average = sum as f64 / count as f64;
        RatingSummary {
            average: (average * 10.0).round() / 10.0,
            count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Hospital {
    pub id: HospitalId,
    pub owner_id: UserId,
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
    pub is_verified: bool,
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
    #[serde(default)]
    pub er_wait_times: Option<ErWaitTimes>,
    #[serde(default)]
    pub rating: RatingSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One user's rating of one hospital. Unique per `(user_id, hospital_id)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rating {
    pub user_id: UserId,
    pub hospital_id: HospitalId,
    pub value: u8,
    #[serde(default)]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    Patient,
    Staff,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserAccount {
    pub id: UserId,
    pub email: String,
    pub display_name: String,
    pub role: AccountRole,
    pub created_at: DateTime<Utc>,
}

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{AppError, ErrorDetail};
use crate::geo;
use crate::hospital::types::{
    BedCounts, BedType, CriticalCare, Diagnostics, ErWaitSnapshot, Hospital, HospitalId,
    Specialization, SupportServices,
};
use crate::store::filter::{HospitalFilter, SortDirection, StoreSortField};

/// Raw query-string parameters. Everything arrives as text so malformed numbers surface as
/// validation errors in the response body instead of extractor rejections.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub specialization: Option<String>,
    pub min_rating: Option<String>,
    pub bed_type: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    Distance,
    Rating,
    Name,
    Availability,
}

impl SortMode {
    pub fn default_direction(&self) -> SortDirection {
        match self {
            SortMode::Distance | SortMode::Name => SortDirection::Asc,
            SortMode::Rating | SortMode::Availability => SortDirection::Desc,
        }
    }

    /// Store-native field for modes that need no derived data.
    pub fn pushdown_field(&self) -> Option<StoreSortField> {
        match self {
            SortMode::Name => Some(StoreSortField::Name),
            SortMode::Rating => Some(StoreSortField::Rating),
            SortMode::Distance | SortMode::Availability => None,
        }
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "distance" => Ok(SortMode::Distance),
            "rating" => Ok(SortMode::Rating),
            "name" => Ok(SortMode::Name),
            "availability" => Ok(SortMode::Availability),
            other => Err(format!("unknown sort '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
}

impl Position {
    /// Both or neither coordinate must be supplied, inside WGS84 ranges.
    pub fn parse(lat: Option<&str>, lon: Option<&str>) -> Result<Option<Self>, AppError> {
        let lat: Option<f64> = parse_number("lat", lat)?;
        let lon: Option<f64> = parse_number("lon", lon)?;
        match (lat, lon) {
            (None, None) => Ok(None),
            (Some(lat), Some(lon)) if geo::valid_coordinates(lat, lon) => {
                Ok(Some(Position { lat, lon }))
            }
            (Some(_), Some(_)) => Err(AppError::Validation("coordinates out of range".to_string())),
            _ => Err(AppError::Validation(
                "lat and lon must be supplied together".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_page_size: usize,
    pub max_page_size: usize,
}

/// A validated search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// Normalized free text; `None` for browse mode.
    pub query: Option<String>,
    pub position: Option<Position>,
    pub filter: HospitalFilter,
    /// Client-chosen ordering. In query mode `None` means relevance.
    pub sort: Option<SortMode>,
    pub direction: Option<SortDirection>,
    pub page: usize,
    pub page_size: usize,
}

fn parse_number<T: FromStr>(field: &str, raw: Option<&str>) -> Result<Option<T>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(text) => text
            .parse()
            .map(Some)
            .map_err(|_| AppError::Validation(format!("{} must be a number, got '{}'", field, text))),
    }
}

fn non_blank(raw: Option<&String>) -> Option<&str> {
    raw.map(|s| s.trim()).filter(|s| !s.is_empty())
}

impl SearchRequest {
    pub fn parse(params: &SearchParams, limits: PageLimits) -> Result<Self, AppError> {
        let position = Position::parse(params.lat.as_deref(), params.lon.as_deref())?;

        let min_rating: Option<f64> = parse_number("min_rating", params.min_rating.as_deref())?;
        if let Some(min) = min_rating
            && !(0.0..=5.0).contains(&min)
        {
            return Err(AppError::Validation("min_rating must be between 0 and 5".to_string()));
        }

        let bed_type = non_blank(params.bed_type.as_ref())
            .map(BedType::from_str)
            .transpose()
            .map_err(AppError::Validation)?;
        let sort = non_blank(params.sort.as_ref())
            .map(SortMode::from_str)
            .transpose()
            .map_err(AppError::Validation)?;
        let direction = match non_blank(params.direction.as_ref()).map(str::to_ascii_lowercase) {
            None => None,
            Some(d) if d == "asc" => Some(SortDirection::Asc),
            Some(d) if d == "desc" => Some(SortDirection::Desc),
            Some(other) => {
                return Err(AppError::Validation(format!("unknown direction '{}'", other)));
            }
        };

        let page: i64 = parse_number("page", params.page.as_deref())?.unwrap_or(1);
        if page < 1 {
            return Err(AppError::Validation("page must be at least 1".to_string()));
        }
        let page_size: i64 = parse_number("page_size", params.page_size.as_deref())?
            .unwrap_or(limits.default_page_size as i64);
        if page_size < 1 || page_size > limits.max_page_size as i64 {
            return Err(AppError::Validation(format!(
                "page_size must be between 1 and {}",
                limits.max_page_size
            )));
        }

        let offset = (page - 1)
            .checked_mul(page_size)
            .and_then(|offset| usize::try_from(offset).ok());
        if offset.is_none() {
            return Err(AppError::Validation("page is out of range".to_string()));
        }

        let filter = HospitalFilter {
            specialization: non_blank(params.specialization.as_ref()).map(str::to_string),
            min_rating,
            bed_type,
            ..HospitalFilter::patient_facing()
        };

        Ok(SearchRequest {
            query: non_blank(params.q.as_ref()).map(|q| q.to_lowercase()),
            position,
            filter,
            sort,
            direction,
            page: page as usize,
            page_size: page_size as usize,
        })
    }

    /// Ordering actually applied. `None` means relevance order, which only query mode uses
    /// when no sort was requested. Distance without a position falls back to availability.
    pub fn effective_sort(&self) -> Option<SortMode> {
        let mode = match (self.sort, &self.query) {
            (None, Some(_)) => return None,
            (None, None) => SortMode::Availability,
            (Some(mode), _) => mode,
        };
        match mode {
            SortMode::Distance if self.position.is_none() => Some(SortMode::Availability),
            mode => Some(mode),
        }
    }

    pub fn direction_for(&self, mode: SortMode) -> SortDirection {
        self.direction.unwrap_or_else(|| mode.default_direction())
    }

    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

/// One enriched hospital card.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HospitalResult {
    pub id: HospitalId,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub phone: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub beds: BedCounts,
    pub total_free_beds: u32,
    pub specializations: Vec<Specialization>,
    pub diagnostics: Diagnostics,
    pub critical_care: CriticalCare,
    pub support_services: SupportServices,
    /// Rounded to two decimals; `None` without a position.
    pub distance_km: Option<f64>,
    pub average_rating: f64,
    pub rating_count: u32,
    pub er_wait_times: ErWaitSnapshot,
    /// Set in query mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance: Option<u32>,
    /// Set in browse mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viability: Option<f64>,
}

impl HospitalResult {
    pub fn from_hospital(hospital: Hospital, distance_km: Option<f64>) -> Self {
        Self {
            total_free_beds: hospital.beds.total(),
            er_wait_times: ErWaitSnapshot::from(hospital.er_wait_times.as_ref()),
            average_rating: hospital.rating.average,
            rating_count: hospital.rating.count,
            id: hospital.id,
            name: hospital.name,
            address: hospital.address,
            city: hospital.city,
            state: hospital.state,
            pincode: hospital.pincode,
            phone: hospital.phone,
            latitude: hospital.latitude,
            longitude: hospital.longitude,
            beds: hospital.beds,
            specializations: hospital.specializations,
            diagnostics: hospital.diagnostics,
            critical_care: hospital.critical_care,
            support_services: hospital.support_services,
            distance_km: distance_km.map(geo::round_km),
            relevance: None,
            viability: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    pub results: Vec<HospitalResult>,
    pub total_count: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    /// Present when the search failed; `results` is then empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,
}

impl SearchResponse {
    pub fn failed(error: &AppError, page: usize, page_size: usize) -> Self {
        Self {
            results: Vec::new(),
            total_count: 0,
            page,
            page_size,
            total_pages: 0,
            error: Some(error.detail()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SuggestParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Suggestions {
    pub hospital_names: Vec<String>,
    pub specializations: Vec<String>,
    pub facilities: Vec<String>,
    pub bed_types: Vec<String>,
}

/// Optional caller position for the hospital detail view.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailParams {
    pub lat: Option<String>,
    pub lon: Option<String>,
}

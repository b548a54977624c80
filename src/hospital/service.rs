use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::protocol::{RatingResponse, RegisterHospitalRequest, RegisterHospitalResponse, SubmitRatingRequest};
use super::types::{
    AccountRole, CapabilitySet, ErWaitUpdate, Hospital, HospitalId, InventoryUpdate, Rating,
    UserAccount,
};
use crate::actor::{Actor, UserId};
use crate::broadcast::Broadcaster;
use crate::error::AppError;
use crate::geo;
use crate::store::Store;
use crate::validation;

pub const MAX_COMMENT_LEN: usize = 1000;

/// Staff-side and rating mutations on the hospital aggregate.
///
/// Every accepted mutation is written through the store's atomic path first and only then
/// handed to the broadcaster.
#[derive(Clone)]
pub struct HospitalService {
    store: Arc<dyn Store>,
    broadcaster: Broadcaster,
}

impl HospitalService {
    pub fn new(store: Arc<dyn Store>, broadcaster: Broadcaster) -> Self {
        Self { store, broadcaster }
    }

    /// Creates the staff account and its hospital in one write. The hospital starts unverified.
    pub async fn register(
        &self,
        req: RegisterHospitalRequest,
        now: DateTime<Utc>,
    ) -> Result<RegisterHospitalResponse, AppError> {
        let email = validation::email(&req.email)?;
        let display_name = validation::name("display_name", &req.display_name)?;
        let name = validation::name("name", &req.name)?;
        let address = validation::name("address", &req.address)?;
        let city = validation::name("city", &req.city)?;
        let phone = req.phone.as_deref().map(validation::phone).transpose()?;
        if !geo::valid_coordinates(req.latitude, req.longitude) {
            return Err(AppError::Validation("coordinates out of range".to_string()));
        }
        req.beds.validate().map_err(AppError::Validation)?;
        req.diagnostics.validate("diagnostics").map_err(AppError::Validation)?;
        req.critical_care.validate("critical_care").map_err(AppError::Validation)?;
        req.support_services
            .validate("support_services")
            .map_err(AppError::Validation)?;

        let account = UserAccount {
            id: UserId::new(),
            email,
            display_name,
            role: AccountRole::Staff,
            created_at: now,
        };
        let hospital = Hospital {
            id: HospitalId::new(),
            owner_id: account.id.clone(),
            name,
            address,
            city,
            state: req.state.trim().to_string(),
            pincode: req.pincode.trim().to_string(),
            phone,
            latitude: req.latitude,
            longitude: req.longitude,
            is_verified: false,
            beds: req.beds,
            specializations: req.specializations,
            diagnostics: req.diagnostics,
            critical_care: req.critical_care,
            support_services: req.support_services,
            er_wait_times: None,
            rating: Default::default(),
            created_at: now,
            updated_at: now,
        };

        let (account, hospital) = self.store.register_hospital(account, hospital).await?;
        tracing::info!("Hospital {} ({}) registered, awaiting verification", hospital.name, hospital.id);
        Ok(RegisterHospitalResponse { account, hospital })
    }

    pub async fn update_inventory(
        &self,
        actor: &Actor,
        id: &HospitalId,
        update: &InventoryUpdate,
        now: DateTime<Utc>,
    ) -> Result<Hospital, AppError> {
        actor.require_staff_of(id)?;
        if update.is_empty() {
            return Err(AppError::Validation("no bed counters supplied".to_string()));
        }

        let hospital = self.store.apply_bed_changes(id, update, now).await?;
        tracing::info!(
            "Inventory for {} now general={} icu={} oxygen={}",
            id,
            hospital.beds.general,
            hospital.beds.icu,
            hospital.beds.oxygen
        );
        self.broadcaster.inventory_changed(&hospital);
        Ok(hospital)
    }

    pub async fn update_er_wait_times(
        &self,
        actor: &Actor,
        id: &HospitalId,
        update: &ErWaitUpdate,
        now: DateTime<Utc>,
    ) -> Result<Hospital, AppError> {
        actor.require_staff_of(id)?;
        update.validate().map_err(AppError::Validation)?;

        let hospital = self.store.update_er_wait_times(id, update, now).await?;
        tracing::info!("ER wait times updated for {}", id);
        self.broadcaster.er_wait_changed(&hospital);
        Ok(hospital)
    }

    /// Inserts or replaces the caller's rating of a verified hospital.
    pub async fn submit_rating(
        &self,
        actor: &Actor,
        id: &HospitalId,
        req: SubmitRatingRequest,
        now: DateTime<Utc>,
    ) -> Result<RatingResponse, AppError> {
        let user_id = actor
            .user_id()
            .ok_or_else(|| AppError::Authorization("sign in to rate a hospital".to_string()))?;
        let value = u8::try_from(req.value)
            .ok()
            .filter(|v| (1..=5).contains(v))
            .ok_or_else(|| AppError::Validation("rating must be between 1 and 5".to_string()))?;
        let comment = req
            .comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        if comment.as_ref().is_some_and(|c| c.chars().count() > MAX_COMMENT_LEN) {
            return Err(AppError::Validation(format!(
                "comment must be at most {} characters",
                MAX_COMMENT_LEN
            )));
        }

        self.visible_hospital(id).await?;

        let rating = Rating {
            user_id: user_id.clone(),
            hospital_id: id.clone(),
            value,
            comment,
            created_at: now,
            updated_at: now,
        };
        let (rating, summary) = self.store.upsert_rating(rating).await?;
        tracing::info!("Rating {} recorded for {} (avg {:.1} over {})", value, id, summary.average, summary.count);

        if let Some(hospital) = self.store.get_hospital(id).await? {
            self.broadcaster.rating_changed(&hospital);
        }
        Ok(RatingResponse { rating, summary })
    }

    /// Verifies or revokes a hospital. Revocation is the only removal path.
    pub async fn set_verification(
        &self,
        actor: &Actor,
        id: &HospitalId,
        verified: bool,
        now: DateTime<Utc>,
    ) -> Result<Hospital, AppError> {
        actor.require_admin()?;
        let hospital = self.store.set_verified(id, verified, now).await?;
        if verified {
            tracing::info!("Hospital {} verified", id);
        } else {
            tracing::warn!("Hospital {} verification revoked", id);
        }
        Ok(hospital)
    }

    /// Raw record for the hospital's own staff or an admin, whatever its verification state.
    pub async fn staff_view(&self, actor: &Actor, id: &HospitalId) -> Result<Hospital, AppError> {
        if !matches!(actor, Actor::Admin { .. }) {
            actor.require_staff_of(id)?;
        }
        self.store
            .get_hospital(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("hospital {} not found", id)))
    }

    async fn visible_hospital(&self, id: &HospitalId) -> Result<Hospital, AppError> {
        self.store
            .get_hospital(id)
            .await?
            .filter(|h| h.is_verified)
            .ok_or_else(|| AppError::NotFound(format!("hospital {} not found", id)))
    }
}

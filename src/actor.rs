//! Caller identity.
//!
//! Authentication happens upstream; the gateway forwards the verified identity in
//! `x-user-id`, `x-role` and (for staff) `x-hospital-id`. A request without them is anonymous.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AppError;
use crate::hospital::types::HospitalId;

pub const HEADER_USER_ID: &str = "x-user-id";
pub const HEADER_ROLE: &str = "x-role";
pub const HEADER_HOSPITAL_ID: &str = "x-hospital-id";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub String);

impl UserId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Actor {
    Anonymous,
    Patient {
        user_id: UserId,
    },
    /// Staff account bound to the one hospital it administers.
    Staff {
        user_id: UserId,
        hospital_id: HospitalId,
    },
    Admin {
        user_id: UserId,
    },
}

impl Actor {
    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            Actor::Anonymous => None,
            Actor::Patient { user_id } | Actor::Staff { user_id, .. } | Actor::Admin { user_id } => {
                Some(user_id)
            }
        }
    }

    pub fn is_staff_of(&self, hospital: &HospitalId) -> bool {
        matches!(self, Actor::Staff { hospital_id, .. } if hospital_id == hospital)
    }

    pub fn require_staff_of(&self, hospital: &HospitalId) -> Result<(), AppError> {
        if self.is_staff_of(hospital) {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "only staff of hospital {} may perform this action",
                hospital
            )))
        }
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        match self {
            Actor::Admin { .. } => Ok(()),
            _ => Err(AppError::Authorization(
                "administrator role required".to_string(),
            )),
        }
    }

    /// Builds an actor from the raw header values.
    pub fn from_headers(
        user_id: Option<&str>,
        role: Option<&str>,
        hospital_id: Option<&str>,
    ) -> Result<Self, AppError> {
        let user_id = match user_id.map(str::trim).filter(|s| !s.is_empty()) {
            Some(id) => UserId(id.to_string()),
            None => return Ok(Actor::Anonymous),
        };

        match role.map(|r| r.trim().to_ascii_lowercase()).as_deref() {
            None | Some("patient") => Ok(Actor::Patient { user_id }),
            Some("staff") => {
                let hospital_id = hospital_id
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| {
                        AppError::Validation(format!("staff requests require {}", HEADER_HOSPITAL_ID))
                    })?;
                Ok(Actor::Staff {
                    user_id,
                    hospital_id: HospitalId(hospital_id.to_string()),
                })
            }
            Some("admin") => Ok(Actor::Admin { user_id }),
            Some(other) => Err(AppError::Validation(format!("unknown role '{}'", other))),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        };

        Actor::from_headers(
            header(HEADER_USER_ID).as_deref(),
            header(HEADER_ROLE).as_deref(),
            header(HEADER_HOSPITAL_ID).as_deref(),
        )
    }
}

//! Hospital Aggregate
//!
//! The hospital record is the unit everything else hangs off: search ranks it, bookings and
//! queue entries point at it, and broadcasts are scoped to its room.
//!
//! ## Mutations
//! - **Inventory**: bed counters change through one atomic store call; a change that would
//!   leave any counter negative is rejected as a whole.
//! - **ER wait times**: per-severity reports merged over the stored snapshot.
//! - **Ratings**: one row per user and hospital, replaced on resubmission.
//! - **Registration / verification**: new hospitals start unverified and stay invisible to
//!   patients until an admin verifies them.

pub mod handlers;
pub mod protocol;
pub mod service;
pub mod types;

pub use service::HospitalService;

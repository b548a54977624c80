//! Virtual Queue Module
//!
//! A per-hospital waiting list that lets patients check in remotely and see where they stand.
//!
//! ## Core Concepts
//! - **Lanes**: One lane per severity. Critical patients are seen before moderate, moderate
//!   before low; within a lane, earlier check-in goes first.
//! - **Position**: Never stored. Counted from the waiting entries of the same lane on each read.
//! - **Lifecycle**: `WAITING -> CALLED | EXPIRED | CANCELLED`, `CALLED -> COMPLETED | CANCELLED`.
//!   Transitions are compare-and-set in the store, so two staff members cannot both call the
//!   same patient.
//! - **Sweeper**: A background task expires entries left waiting past the configured maximum.

pub mod handlers;
pub mod service;
pub mod sweeper;
pub mod types;

pub use service::VirtualQueue;

//! Hospital Capacity Matching Library
//!
//! This library crate defines the modules that make up the availability matching and
//! synchronization engine. It serves as the foundation for the binary executable (`main.rs`).
//!
//! ## Architecture Modules
//! - **`geo`**: Great-circle distance between two coordinates. Leaf of everything else.
//! - **`search`**: Relevance scoring, viability ranking, the query/pagination pipeline and
//!   autocomplete suggestions for patient-facing discovery.
//! - **`broadcast`**: Room-scoped, fire-and-forget fan-out of inventory, wait-time, booking and
//!   queue changes to connected observers.
//! - **`queue`**: The severity-ordered virtual waiting list per hospital, plus the sweeper that
//!   expires abandoned entries.
//! - **`booking`**: The booking lifecycle state machine and its owner-gated transitions.
//! - **`hospital`**: Hospital records, staff-side inventory/ER mutations, ratings and registration.
//! - **`store`**: The storage collaborator contract and its in-memory implementation.
//!
//! Cross-cutting pieces live at the crate root: `actor` (caller identity), `config`, `error`,
//! `validation` (contact field shapes) and `app` (HTTP router wiring).

pub mod actor;
pub mod app;
pub mod booking;
pub mod broadcast;
pub mod config;
pub mod error;
pub mod geo;
pub mod hospital;
pub mod queue;
pub mod search;
pub mod store;
pub mod validation;

#[cfg(test)]
pub(crate) mod fixtures;

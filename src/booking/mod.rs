//! Booking Lifecycle
//!
//! A booking is a patient's notice to a hospital: "I am on my way" (`INCOMING`) or "I have an
//! appointment" (`SCHEDULED`). Hospital staff then admit, divert or complete it.
//!
//! ## Rules
//! - Transitions follow a fixed table; anything else is a validation error.
//! - Only the owning hospital's staff move a booking forward. The patient who made it may cancel.
//! - Every accepted change is pushed to the owning hospital's room and nowhere else.

pub mod handlers;
pub mod lifecycle;
pub mod service;
pub mod types;

pub use service::BookingService;

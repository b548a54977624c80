//! Storage Module
//!
//! The engine treats persistent storage as an external collaborator reachable through simple
//! CRUD operations plus count/find with filter, sort and pagination.
//!
//! ## Core Concepts
//! - **Contract**: `Store` (in `backend`) is the only way services touch records.
//! - **Atomic paths**: Bed counters and status transitions are applied inside the store, never
//!   read-modified-written by callers.
//! - **Pushdown**: `HospitalFilter`, `StoreSort` and `Page` describe what the store can evaluate
//!   natively; orderings that need derived data are computed by the search pipeline instead.
//! - **In-memory backend**: `MemoryStore` keeps each table in a `DashMap`, used by the binary and
//!   by tests.

pub mod backend;
pub mod filter;
pub mod memory;

pub use backend::{Store, StoreError};
pub use memory::MemoryStore;

#[cfg(test)]
mod tests;

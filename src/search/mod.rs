//! Search Service Module
//!
//! Patient-facing discovery: turns free text or structured filters plus an optional position
//! into an ordered, paginated, enriched list of verified hospitals.
//!
//! ## Overview
//! Two modes share one pipeline. **Query mode** (non-empty text) scores every filtered hospital
//! for relevance and drops zero scores. **Browse mode** orders by viability (free capacity
//! against distance) or by a direct field sort. Unverified hospitals never enter either.
//!
//! ## Responsibilities
//! - **Expansion**: Normalizing the query and widening it through a fixed synonym table.
//! - **Scoring**: Additive field weights plus resource bonuses for beds actually free.
//! - **Ranking**: The viability formula and the deterministic comparators behind each sort.
//! - **Pagination**: Total count before slicing; store pushdown where no derived data is needed.
//! - **Enrichment**: Distance, free-bed total, folded rating and the ER wait snapshot per card.
//!
//! ## Submodules
//! - **`tokenizer`**: Normalization and the effective query set.
//! - **`scorer`**: Relevance scoring.
//! - **`ranker`**: Viability and sort comparators.
//! - **`engine`**: The query/pagination pipeline and hospital detail.
//! - **`suggest`**: Autocomplete.
//! - **`handlers`**: HTTP request handlers.
//! - **`types`**: Request parsing/validation and response DTOs.

pub mod engine;
pub mod handlers;
pub mod ranker;
pub mod scorer;
pub mod suggest;
pub mod tokenizer;
pub mod types;

pub use engine::SearchEngine;

#[cfg(test)]
mod tests;

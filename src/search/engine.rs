use std::sync::Arc;

use super::ranker::{self, Candidate};
use super::scorer;
use super::tokenizer::effective_queries;
use super::types::{HospitalResult, PageLimits, Position, SearchRequest, SearchResponse};
use crate::error::AppError;
use crate::geo;
use crate::hospital::types::{Hospital, HospitalId, RatingSummary};
use crate::store::Store;
use crate::store::filter::{Page, StoreSort};

/// The query/pagination pipeline over the hospital store.
#[derive(Clone)]
pub struct SearchEngine {
    pub(super) store: Arc<dyn Store>,
    limits: PageLimits,
}

fn distance_from(position: Option<Position>, hospital: &Hospital) -> Option<f64> {
    position.map(|p| geo::distance_km(p.lat, p.lon, hospital.latitude, hospital.longitude))
}

impl SearchEngine {
    pub fn new(store: Arc<dyn Store>, limits: PageLimits) -> Self {
        Self { store, limits }
    }

    pub fn limits(&self) -> PageLimits {
        self.limits
    }

    /// Runs a validated search and returns one enriched page.
    ///
    /// Query mode and the distance/availability orderings scan the whole filtered set and sort
    /// in memory; name and rating browsing is paged by the store.
    pub async fn search(&self, req: &SearchRequest) -> Result<SearchResponse, AppError> {
        let sort = req.effective_sort();
        let query_mode = req.query.is_some();

        let pushdown = match sort {
            Some(mode) if !query_mode => mode.pushdown_field().map(|field| (mode, field)),
            _ => None,
        };

        let (total_count, page) = match pushdown {
            Some((mode, field)) => {
                let total = self.store.count_hospitals(&req.filter).await?;
                let store_sort = StoreSort {
                    field,
                    direction: req.direction_for(mode),
                };
                let store_page = Page {
                    offset: req.offset(),
                    limit: req.page_size,
                };
                let rows = self
                    .store
                    .find_hospitals(&req.filter, Some(store_sort), Some(store_page))
                    .await?;
                let page = rows
                    .into_iter()
                    .map(|h| {
                        let distance = distance_from(req.position, &h);
                        Candidate::new(h, distance, 0)
                    })
                    .collect::<Vec<_>>();
                (total, page)
            }
            None => {
                let candidates = self.ranked_candidates(req).await?;
                let total = candidates.len();
                let page = candidates
                    .into_iter()
                    .skip(req.offset())
                    .take(req.page_size)
                    .collect::<Vec<_>>();
                (total, page)
            }
        };

        let mut results = Vec::with_capacity(page.len());
        for candidate in page {
            results.push(self.enrich(candidate, query_mode).await?);
        }

        tracing::debug!(
            "Search {:?} matched {} hospitals, returning page {} ({} results)",
            req.query,
            total_count,
            req.page,
            results.len()
        );

        Ok(SearchResponse {
            results,
            total_count,
            page: req.page,
            page_size: req.page_size,
            total_pages: total_count.div_ceil(req.page_size),
            error: None,
        })
    }

    /// Patient-facing detail of one verified hospital, enriched like a search result.
    pub async fn detail(
        &self,
        id: &HospitalId,
        position: Option<Position>,
    ) -> Result<HospitalResult, AppError> {
        let hospital = self
            .store
            .get_hospital(id)
            .await?
            .filter(|h| h.is_verified)
            .ok_or_else(|| AppError::NotFound(format!("hospital {} not found", id)))?;
        let distance = distance_from(position, &hospital);
        self.enrich(Candidate::new(hospital, distance, 0), false).await
    }

    async fn ranked_candidates(&self, req: &SearchRequest) -> Result<Vec<Candidate>, AppError> {
        let rows = self.store.find_hospitals(&req.filter, None, None).await?;
        let queries = req.query.as_deref().map(effective_queries);

        let mut candidates: Vec<Candidate> = rows
            .into_iter()
            .filter_map(|hospital| {
                let relevance = match &queries {
                    Some(queries) => match scorer::score(queries, &hospital) {
                        0 => return None,
                        score => score,
                    },
                    None => 0,
                };
                let distance = distance_from(req.position, &hospital);
                Some(Candidate::new(hospital, distance, relevance))
            })
            .collect();

        match req.effective_sort() {
            None => candidates.sort_by(ranker::compare_relevance),
            Some(mode) => {
                let direction = req.direction_for(mode);
                candidates.sort_by(|a, b| ranker::compare(mode, direction, a, b));
            }
        }
        Ok(candidates)
    }

    async fn enrich(&self, candidate: Candidate, query_mode: bool) -> Result<HospitalResult, AppError> {
        let ratings = self.store.ratings_for_hospital(&candidate.hospital.id).await?;
        let summary = RatingSummary::fold(ratings.iter().map(|r| r.value));

        let mut result = HospitalResult::from_hospital(candidate.hospital, candidate.distance_km);
        result.average_rating = summary.average;
        result.rating_count = summary.count;
        if query_mode {
            result.relevance = Some(candidate.relevance);
        } else {
            result.viability = Some(candidate.viability);
        }
        Ok(result)
    }
}

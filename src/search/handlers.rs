use axum::extract::Query;
use axum::http::StatusCode;
use axum::{Extension, Json};

use super::engine::SearchEngine;
use super::types::{SearchParams, SearchRequest, SearchResponse, SuggestParams, Suggestions};
use crate::error::AppError;

/// Failures still answer with a `SearchResponse`: empty results plus the error object.
pub async fn handle_search(
    Query(params): Query<SearchParams>,
    Extension(engine): Extension<SearchEngine>,
) -> (StatusCode, Json<SearchResponse>) {
    let limits = engine.limits();
    let req = match SearchRequest::parse(&params, limits) {
        Ok(req) => req,
        Err(e) => {
            tracing::debug!("Rejected search parameters: {}", e);
            let response = SearchResponse::failed(&e, 1, limits.default_page_size);
            return (e.status(), Json(response));
        }
    };

    match engine.search(&req).await {
        Ok(response) => (StatusCode::OK, Json(response)),
        Err(e) => {
            tracing::error!("Search failed: {}", e);
            let response = SearchResponse::failed(&e, req.page, req.page_size);
            (e.status(), Json(response))
        }
    }
}

pub async fn handle_suggest(
    Query(params): Query<SuggestParams>,
    Extension(engine): Extension<SearchEngine>,
) -> Result<Json<Suggestions>, AppError> {
    Ok(Json(engine.suggest(&params.q).await?))
}

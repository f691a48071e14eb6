use axum::{Json, extract::State, extract::rejection::JsonRejection};
use std::sync::Arc;

use crate::responder::Responder;

use super::error::ApiError;
use super::models::{HealthResponse, SearchRequest, SearchResponse, SearchResult};

pub async fn search_handler(
    State(responder): State<Arc<Responder>>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Json(request) = payload?;
    let query = request.validate()?;

    let snippet = responder.respond(query);

    // One canned answer per query; num_results does not change that.
    Ok(Json(SearchResponse {
        results: vec![SearchResult::chatbot(snippet)],
    }))
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Manual response API is healthy".to_string(),
    })
}

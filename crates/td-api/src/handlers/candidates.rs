use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use td_core::ranking::{SortDir, SortKey};
use td_core::CandidateRecord;

use crate::error::ApiError;
use crate::SharedState;

#[derive(Debug, Deserialize, Default)]
pub struct CandidateQuery {
    #[serde(default)]
    pub search: String,
    pub min_score: Option<u32>,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

const fn default_limit() -> u32 {
    50
}

#[derive(Debug, Serialize)]
pub struct CandidateListResponse {
    /// Matches before pagination.
    pub total: usize,
    pub sort_key: String,
    pub sort_dir: SortDir,
    pub candidates: Vec<CandidateRecord>,
}

pub async fn list_candidates(
    State(state): State<SharedState>,
    Query(query): Query<CandidateQuery>,
) -> Result<Json<CandidateListResponse>, ApiError> {
    let limit = query.limit.clamp(1, 200) as usize;
    let offset = query.offset.min(10_000) as usize;

    let session = state.session.lock().await;
    let rows = session.view(&query.search, query.min_score);
    let total = rows.len();

    Ok(Json(CandidateListResponse {
        total,
        sort_key: session.sort_state().key.as_str().to_string(),
        sort_dir: session.sort_state().dir,
        candidates: rows.into_iter().skip(offset).take(limit).collect(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct SortRequest {
    pub key: String,
}

#[derive(Debug, Serialize)]
pub struct SortResponse {
    pub sort_key: String,
    pub sort_dir: SortDir,
}

/// Selecting the active key again flips the direction; selecting a new key
/// resets it to that key's default.
pub async fn toggle_sort(
    State(state): State<SharedState>,
    Json(request): Json<SortRequest>,
) -> Result<Json<SortResponse>, ApiError> {
    let mut session = state.session.lock().await;
    session.toggle_sort(SortKey::parse(&request.key));

    Ok(Json(SortResponse {
        sort_key: session.sort_state().key.as_str().to_string(),
        sort_dir: session.sort_state().dir,
    }))
}

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use td_core::session::RequestToken;

use crate::error::ApiError;
use crate::SharedState;

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub request_token: RequestToken,
    pub accepted: bool,
    pub loaded: usize,
    pub skipped_malformed: usize,
    pub skipped_duplicates: usize,
    pub degenerate_weights: bool,
}

/// Run a search against the configured backend and fold the results into
/// the session. The session lock is held across the call, so there is at
/// most one in-flight search per session and a newer request supersedes any
/// response still pending for an older token.
pub async fn run_search(
    State(state): State<SharedState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let mut session = state.session.lock().await;
    let token = session.begin_search();

    let payloads = state.search.search(&request.query)?;
    let ingest = session.apply_search_results(token, payloads);

    Ok(Json(SearchResponse {
        request_token: token,
        accepted: ingest.accepted,
        loaded: ingest.loaded,
        skipped_malformed: ingest.skipped_malformed,
        skipped_duplicates: ingest.skipped_duplicates,
        degenerate_weights: session.degenerate_weights(),
    }))
}

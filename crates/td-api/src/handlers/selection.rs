use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use td_core::CandidateRecord;

use crate::error::ApiError;
use crate::SharedState;

#[derive(Debug, Serialize)]
pub struct SelectionResponse {
    pub count: usize,
    /// Selected candidates in selection order.
    pub candidates: Vec<CandidateRecord>,
}

pub async fn list_selection(State(state): State<SharedState>) -> Json<SelectionResponse> {
    let session = state.session.lock().await;
    let candidates = session.selected_candidates();
    Json(SelectionResponse {
        count: candidates.len(),
        candidates,
    })
}

#[derive(Debug, Deserialize)]
pub struct ToggleSelectionRequest {
    pub candidate_id: String,
}

#[derive(Debug, Serialize)]
pub struct ToggleSelectionResponse {
    pub candidate_id: String,
    pub selected: bool,
    pub count: usize,
}

pub async fn toggle_selection(
    State(state): State<SharedState>,
    Json(request): Json<ToggleSelectionRequest>,
) -> Result<Json<ToggleSelectionResponse>, ApiError> {
    let mut session = state.session.lock().await;
    let selected = session.toggle_selection(&request.candidate_id)?;

    Ok(Json(ToggleSelectionResponse {
        candidate_id: request.candidate_id,
        selected,
        count: session.selection().selected().len(),
    }))
}

#[derive(Debug, Serialize)]
pub struct ClearSelectionResponse {
    pub count: usize,
}

pub async fn clear_selection(State(state): State<SharedState>) -> Json<ClearSelectionResponse> {
    let mut session = state.session.lock().await;
    session.clear_selection();
    Json(ClearSelectionResponse { count: 0 })
}

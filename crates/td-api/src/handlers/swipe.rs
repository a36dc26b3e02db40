use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use td_core::selection::{SwipeDecision, SwipeOutcome};
use td_core::CandidateRecord;

use crate::error::ApiError;
use crate::SharedState;

#[derive(Debug, Serialize)]
pub struct NextCandidateResponse {
    /// None once every candidate in the pool has been decided.
    pub candidate: Option<CandidateRecord>,
    pub remaining: usize,
}

pub async fn next_candidate(State(state): State<SharedState>) -> Json<NextCandidateResponse> {
    let session = state.session.lock().await;
    Json(NextCandidateResponse {
        candidate: session.next_swipe_candidate().cloned(),
        remaining: session.undecided_count(),
    })
}

#[derive(Debug, Deserialize)]
pub struct SwipeRequest {
    pub candidate_id: String,
    pub decision: SwipeDecision,
}

#[derive(Debug, Serialize)]
pub struct SwipeResponse {
    pub outcome: &'static str,
    pub selected: bool,
    pub remaining: usize,
}

pub async fn record_swipe(
    State(state): State<SharedState>,
    Json(request): Json<SwipeRequest>,
) -> Result<Json<SwipeResponse>, ApiError> {
    let mut session = state.session.lock().await;
    let outcome = session.record_swipe(&request.candidate_id, request.decision)?;

    Ok(Json(SwipeResponse {
        outcome: match outcome {
            SwipeOutcome::Recorded => "recorded",
            SwipeOutcome::AlreadyDecided => "already_decided",
        },
        selected: session.selection().is_selected(&request.candidate_id),
        remaining: session.undecided_count(),
    }))
}

#[derive(Debug, Serialize)]
pub struct ResetSwipeResponse {
    pub remaining: usize,
}

/// Clear the swipe log for a re-review pass. Prior accepts stay selected.
pub async fn reset_swipe(State(state): State<SharedState>) -> Json<ResetSwipeResponse> {
    let mut session = state.session.lock().await;
    session.reset_swipe();
    Json(ResetSwipeResponse {
        remaining: session.undecided_count(),
    })
}

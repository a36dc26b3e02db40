use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use td_core::ranking::{CriteriaWeights, CriterionWeight};

use crate::error::ApiError;
use crate::SharedState;

#[derive(Debug, Serialize)]
pub struct WeightsResponse {
    pub criteria: Vec<CriterionWeight>,
    pub degenerate: bool,
}

pub async fn get_weights(State(state): State<SharedState>) -> Json<WeightsResponse> {
    let session = state.session.lock().await;
    Json(WeightsResponse {
        criteria: session.weights().rows().to_vec(),
        degenerate: session.weights().is_degenerate(),
    })
}

#[derive(Debug, Deserialize)]
pub struct ReplaceWeightsRequest {
    pub criteria: Vec<CriterionWeight>,
}

pub async fn replace_weights(
    State(state): State<SharedState>,
    Json(request): Json<ReplaceWeightsRequest>,
) -> Result<Json<WeightsResponse>, ApiError> {
    let mut session = state.session.lock().await;
    session.replace_weights(CriteriaWeights::from_rows(request.criteria));

    Ok(Json(WeightsResponse {
        criteria: session.weights().rows().to_vec(),
        degenerate: session.weights().is_degenerate(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct UpsertCriterionRequest {
    pub key: String,
    pub weight: f64,
    pub label: Option<String>,
}

pub async fn upsert_criterion(
    State(state): State<SharedState>,
    Json(request): Json<UpsertCriterionRequest>,
) -> Result<Json<WeightsResponse>, ApiError> {
    let key = request.key.trim().to_lowercase();
    if key.is_empty() {
        return Err(ApiError::BadRequest("criterion key must not be blank".into()));
    }

    let label = request.label.unwrap_or_else(|| key.clone());

    let mut session = state.session.lock().await;
    session.upsert_criterion(&key, request.weight, &label);

    Ok(Json(WeightsResponse {
        criteria: session.weights().rows().to_vec(),
        degenerate: session.weights().is_degenerate(),
    }))
}

pub async fn remove_criterion(
    State(state): State<SharedState>,
    Path(key): Path<String>,
) -> Result<Json<WeightsResponse>, ApiError> {
    let mut session = state.session.lock().await;
    if !session.remove_criterion(&key) {
        return Err(ApiError::NotFound(format!("unknown criterion: {key}")));
    }

    Ok(Json(WeightsResponse {
        criteria: session.weights().rows().to_vec(),
        degenerate: session.weights().is_degenerate(),
    }))
}

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use td_core::outreach::{OutreachMessage, OutreachRequestConfig};
use td_core::SenderProfile;

use crate::error::ApiError;
use crate::SharedState;

#[derive(Debug, Deserialize)]
pub struct OutreachRequest {
    #[serde(default)]
    pub config: OutreachRequestConfig,
    #[serde(default)]
    pub sender: SenderProfile,
}

#[derive(Debug, Serialize)]
pub struct OutreachResponse {
    /// Messages in selection order, one per selected candidate.
    pub messages: Vec<OutreachMessage>,
}

pub async fn generate_outreach(
    State(state): State<SharedState>,
    Json(request): Json<OutreachRequest>,
) -> Result<Json<OutreachResponse>, ApiError> {
    let mut session = state.session.lock().await;
    let messages = session.generate_outreach(&state.generator, &request.config, &request.sender)?;

    Ok(Json(OutreachResponse { messages }))
}

use std::sync::atomic::Ordering;

use axum::{extract::State, http::StatusCode};

use crate::SharedState;

pub async fn livez() -> &'static str {
    "ok"
}

pub async fn readyz(State(state): State<SharedState>) -> (StatusCode, &'static str) {
    if state.readiness.load(Ordering::SeqCst) {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "draining")
    }
}

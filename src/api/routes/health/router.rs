//! Router for the health API

use std::sync::Arc;

use axum::{Json, Router, routing::get};

use super::public::HealthResponse;
use crate::api::state::AppState;

type SharedState = Arc<AppState>;

/// Liveness probe. Doesn't touch the model or the session store.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// Create the health router
pub fn router() -> Router<SharedState> {
    Router::new().route("/health", get(health))
}

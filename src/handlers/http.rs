//! Shared handler state and health check.

use axum::{http::StatusCode, Json};
use serde_json::json;
use std::sync::Arc;

use crate::services::VerificationService;

/// Shared application state for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub verification: Arc<VerificationService>,
}

impl AppState {
    pub fn new(verification: VerificationService) -> Self {
        Self {
            verification: Arc::new(verification),
        }
    }

    pub fn verification(&self) -> &VerificationService {
        &self.verification
    }
}

/// GET /health: liveness check.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "service": "signup" })),
    )
}

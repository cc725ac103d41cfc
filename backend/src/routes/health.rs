//! Health check endpoints
//!
//! `/health/ready` separates what the tracker cannot work without (the store)
//! from what it can degrade around: when the food database is unreachable,
//! users still log food by hand, so the service reports `degraded` but stays
//! in rotation.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckState {
    Ok,
    Degraded,
    Failed,
}

#[derive(Debug, Serialize)]
pub struct Check {
    pub state: CheckState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Check {
    fn ok() -> Self {
        Self {
            state: CheckState::Ok,
            message: None,
        }
    }

    fn with(state: CheckState, message: impl ToString) -> Self {
        Self {
            state,
            message: Some(message.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReadinessChecks {
    pub store: Check,
    pub food_database: Check,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<ReadinessChecks>,
}

impl HealthResponse {
    fn plain(status: &'static str) -> Self {
        Self {
            status,
            version: env!("CARGO_PKG_VERSION"),
            checks: None,
        }
    }
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::plain("healthy"))
}

/// GET /health/live
pub async fn liveness_check() -> Json<HealthResponse> {
    Json(HealthResponse::plain("alive"))
}

/// GET /health/ready - 503 only when the store is unreadable
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let store = match state.store().get_profile().await {
        Ok(_) => Check::ok(),
        Err(e) => {
            warn!(error = %e, "Store readiness check failed");
            Check::with(CheckState::Failed, e)
        }
    };
    let food_database = match state.food_lookup.ping().await {
        Ok(()) => Check::ok(),
        Err(e) => Check::with(CheckState::Degraded, e),
    };

    let (code, status) = match (store.state, food_database.state) {
        (CheckState::Failed, _) => (StatusCode::SERVICE_UNAVAILABLE, "not_ready"),
        (_, CheckState::Ok) => (StatusCode::OK, "ready"),
        _ => (StatusCode::OK, "degraded"),
    };

    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            checks: Some(ReadinessChecks {
                store,
                food_database,
            }),
        }),
    )
}

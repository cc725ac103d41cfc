//! Step count routes

use crate::error::ApiError;
use crate::repositories::StepRecord;
use crate::services::StepReading;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use macro_tracker_shared::step_progress;
use macro_tracker_shared::types::{StepCountResponse, StepQuery, StepSyncRequest};
use tracing::info;

/// Create step routes
pub fn step_routes() -> Router<AppState> {
    Router::new().route("/", get(get_steps).put(sync_steps))
}

fn to_response(state: &AppState, reading: StepReading) -> StepCountResponse {
    StepCountResponse {
        steps: reading.steps,
        fetched_at: reading.fetched_at,
        progress: step_progress(reading.steps, state.config().steps.daily_goal),
    }
}

/// GET /api/v1/steps?refresh=true - Today's step count
async fn get_steps(
    State(state): State<AppState>,
    Query(query): Query<StepQuery>,
) -> Result<Json<StepCountResponse>, ApiError> {
    let reading = state.steps.today(query.refresh).await?;
    Ok(Json(to_response(&state, reading)))
}

/// PUT /api/v1/steps - Device sync of today's count
async fn sync_steps(
    State(state): State<AppState>,
    Json(req): Json<StepSyncRequest>,
) -> Result<Json<StepCountResponse>, ApiError> {
    let record = StepRecord {
        date: state.calendar.today(),
        steps: req.steps,
        recorded_at: Utc::now(),
    };
    state.store().save_steps(record).await?;
    info!(steps = req.steps, date = %record.date, "Step count synced");

    let reading = state.steps.today(true).await?;
    Ok(Json(to_response(&state, reading)))
}

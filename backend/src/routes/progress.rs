//! Daily progress and history routes

use crate::error::ApiError;
use crate::services::ProgressService;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use macro_tracker_shared::types::{DailyProgressResponse, DateQuery, HistoryQuery};
use macro_tracker_shared::DailySummary;

/// GET /api/v1/progress?date=YYYY-MM-DD - Totals against targets (default today)
pub async fn get_progress(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<DailyProgressResponse>, ApiError> {
    let date = query.date.unwrap_or_else(|| state.calendar.today());
    let response = ProgressService::daily_progress(
        state.store(),
        &state.steps,
        &state.calendar,
        state.config().steps.daily_goal,
        date,
    )
    .await?;
    Ok(Json(response))
}

/// GET /api/v1/history?start=&end= - Per-day totals, empty days included
pub async fn get_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<DailySummary>>, ApiError> {
    let days = ProgressService::history(state.store(), &state.calendar, query.start, query.end).await?;
    Ok(Json(days))
}

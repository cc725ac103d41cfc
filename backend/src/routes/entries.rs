//! Food log API routes

use crate::error::ApiError;
use crate::services::FoodLogService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use macro_tracker_shared::types::{
    DateQuery, EditPortionRequest, FoodEntryResponse, LogEntryRequest, QuickAddRequest,
};
use uuid::Uuid;

/// Create food log routes
pub fn entry_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_entries).post(log_entry))
        .route("/quick-add", post(quick_add))
        .route("/:id", patch(edit_portion).delete(delete_entry))
}

/// POST /api/v1/entries - Log a manually entered food
async fn log_entry(
    State(state): State<AppState>,
    Json(req): Json<LogEntryRequest>,
) -> Result<(StatusCode, Json<FoodEntryResponse>), ApiError> {
    let entry = FoodLogService::log_entry(state.store(), &req).await?;
    Ok((StatusCode::CREATED, Json(entry.into())))
}

/// GET /api/v1/entries?date=YYYY-MM-DD - Entries for one day (default today)
async fn list_entries(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Vec<FoodEntryResponse>>, ApiError> {
    let date = query.date.unwrap_or_else(|| state.calendar.today());
    let entries = FoodLogService::entries_for_date(state.store(), date, &state.calendar).await?;
    Ok(Json(entries.into_iter().map(FoodEntryResponse::from).collect()))
}

/// PATCH /api/v1/entries/:id - Change the portion size
async fn edit_portion(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<EditPortionRequest>,
) -> Result<Json<FoodEntryResponse>, ApiError> {
    let entry = FoodLogService::edit_portion(state.store(), id, &req).await?;
    Ok(Json(entry.into()))
}

/// DELETE /api/v1/entries/:id
async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    FoodLogService::delete_entry(state.store(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/entries/quick-add - Log a template again
async fn quick_add(
    State(state): State<AppState>,
    Json(req): Json<QuickAddRequest>,
) -> Result<(StatusCode, Json<FoodEntryResponse>), ApiError> {
    let entry = FoodLogService::quick_add(state.store(), &req).await?;
    Ok((StatusCode::CREATED, Json(entry.into())))
}

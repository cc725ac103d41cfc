//! Quick-add template routes

use crate::error::ApiError;
use crate::services::FoodLogService;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use macro_tracker_shared::types::TemplateQuery;
use macro_tracker_shared::FoodTemplate;

/// GET /api/v1/templates?q= - Templates, most recently used first
pub async fn list_templates(
    State(state): State<AppState>,
    Query(query): Query<TemplateQuery>,
) -> Result<Json<Vec<FoodTemplate>>, ApiError> {
    let templates = FoodLogService::templates(state.store(), query.q.as_deref()).await?;
    Ok(Json(templates))
}

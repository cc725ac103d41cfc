//! Food database lookup routes

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use macro_tracker_shared::types::FoodSearchQuery;
use macro_tracker_shared::NutritionRecord;

/// Create food lookup routes
pub fn food_routes() -> Router<AppState> {
    Router::new()
        .route("/barcode/:code", get(lookup_barcode))
        .route("/search", get(search_foods))
}

/// GET /api/v1/foods/barcode/:code - Look up a scanned barcode
async fn lookup_barcode(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<NutritionRecord>, ApiError> {
    let record = state.food_lookup.lookup_barcode(&code).await?;
    Ok(Json(record))
}

/// GET /api/v1/foods/search?q=&limit= - Search the food database
async fn search_foods(
    State(state): State<AppState>,
    Query(query): Query<FoodSearchQuery>,
) -> Result<Json<Vec<NutritionRecord>>, ApiError> {
    let limit = state.config().search_limit(query.limit);
    let records = state.food_lookup.search(&query.q, limit).await?;
    Ok(Json(records))
}

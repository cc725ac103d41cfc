//! User profile API routes

use crate::error::ApiError;
use crate::services::ProfileService;
use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use macro_tracker_shared::types::ProfileResponse;
use macro_tracker_shared::validation::ProfileForm;
use macro_tracker_shared::NutritionTargets;

/// Create profile routes
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_profile).put(update_profile))
        .route("/targets", get(get_targets))
}

/// GET /api/v1/profile - Get the profile with BMR, TDEE and targets
async fn get_profile(State(state): State<AppState>) -> Result<Json<ProfileResponse>, ApiError> {
    Ok(Json(ProfileService::get_profile(state.store()).await?))
}

/// PUT /api/v1/profile - Replace the profile from form text
async fn update_profile(
    State(state): State<AppState>,
    Json(form): Json<ProfileForm>,
) -> Result<Json<ProfileResponse>, ApiError> {
    Ok(Json(ProfileService::update_profile(state.store(), &form).await?))
}

/// GET /api/v1/profile/targets - Current calorie and macro targets
async fn get_targets(State(state): State<AppState>) -> Result<Json<NutritionTargets>, ApiError> {
    Ok(Json(ProfileService::get_targets(state.store()).await?))
}

//! Profile service - business logic for the user profile

use crate::error::ApiError;
use crate::repositories::NutritionStore;
use macro_tracker_shared::types::ProfileResponse;
use macro_tracker_shared::validation::{validate_profile, ProfileForm};
use macro_tracker_shared::{calculate_bmr, calculate_targets, calculate_tdee, NutritionTargets, UserProfile};
use tracing::info;

/// Profile service for profile operations
pub struct ProfileService;

impl ProfileService {
    fn to_response(profile: UserProfile) -> ProfileResponse {
        ProfileResponse {
            bmr: calculate_bmr(&profile),
            tdee: calculate_tdee(&profile),
            targets: calculate_targets(&profile),
            profile,
        }
    }

    /// Get the profile with its derived values
    pub async fn get_profile(store: &dyn NutritionStore) -> Result<ProfileResponse, ApiError> {
        let profile = store
            .get_profile()
            .await?
            .ok_or_else(|| ApiError::NotFound("Profile not set up".to_string()))?;
        Ok(Self::to_response(profile))
    }

    /// Validate and replace the profile
    pub async fn update_profile(
        store: &dyn NutritionStore,
        form: &ProfileForm,
    ) -> Result<ProfileResponse, ApiError> {
        let profile = validate_profile(form)?;
        store.save_profile(profile.clone()).await?;

        info!(
            activity_level = ?profile.activity_level,
            goal = ?profile.goal,
            "Profile updated"
        );
        Ok(Self::to_response(profile))
    }

    /// Current calorie and macro targets
    pub async fn get_targets(store: &dyn NutritionStore) -> Result<NutritionTargets, ApiError> {
        Ok(Self::get_profile(store).await?.targets)
    }
}

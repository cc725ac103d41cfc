//! Macro Tracker WASM Module
//!
//! WebAssembly bindings over the shared engine so a browser or mobile
//! front-end can show targets and progress without a round trip.

use macro_tracker_shared::food::SERVING_NORMALIZATION_GRAMS;
use macro_tracker_shared::{
    calculate_bmr, daily_calorie_target as calorie_target, ActivityLevel, FoodEntry, Gender,
    Progress, ProgressState, UserProfile, WeightGoal,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

fn profile(
    age_years: u32,
    weight_kg: f64,
    height_cm: u32,
    is_male: bool,
    activity_level: &str,
    goal: &str,
) -> Result<UserProfile, JsValue> {
    Ok(UserProfile {
        age_years,
        weight_kg,
        height_cm,
        gender: if is_male { Gender::Male } else { Gender::Female },
        activity_level: activity_level.parse::<ActivityLevel>().map_err(JsValue::from)?,
        goal: goal.parse::<WeightGoal>().map_err(JsValue::from)?,
    })
}

/// Basal metabolic rate (Mifflin-St Jeor)
#[wasm_bindgen]
pub fn bmr(age_years: u32, weight_kg: f64, height_cm: u32, is_male: bool) -> f64 {
    calculate_bmr(&UserProfile {
        age_years,
        weight_kg,
        height_cm,
        gender: if is_male { Gender::Male } else { Gender::Female },
        activity_level: ActivityLevel::default(),
        goal: WeightGoal::default(),
    })
}

/// Daily calorie target; may be negative for extreme inputs
#[wasm_bindgen]
pub fn daily_calorie_target(
    age_years: u32,
    weight_kg: f64,
    height_cm: u32,
    is_male: bool,
    activity_level: &str,
    goal: &str,
) -> Result<f64, JsValue> {
    let profile = profile(age_years, weight_kg, height_cm, is_male, activity_level, goal)?;
    Ok(calorie_target(&profile))
}

/// Calories consumed by a serialized [`FoodEntry`]
#[wasm_bindgen]
pub fn entry_total(entry_json: &str) -> Result<f64, JsValue> {
    let entry: FoodEntry =
        serde_json::from_str(entry_json).map_err(|e| JsValue::from(e.to_string()))?;
    Ok(entry.total_calories())
}

#[wasm_bindgen]
pub fn servings_to_grams(servings: f64) -> f64 {
    servings * SERVING_NORMALIZATION_GRAMS
}

#[derive(Serialize)]
struct ProgressView {
    state: ProgressState,
    ratio: f64,
    display_ratio: f64,
    remaining: f64,
}

/// Progress of `eaten` against `target` as JSON; no target without a profile
#[wasm_bindgen]
pub fn progress_state(target: Option<f64>, eaten: f64) -> String {
    let progress = Progress::new(target, eaten);
    let view = ProgressView {
        state: progress.state,
        ratio: progress.ratio,
        display_ratio: progress.display_ratio(),
        remaining: progress.remaining,
    };
    serde_json::to_string(&view).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmr() {
        assert_eq!(bmr(30, 70.0, 175, true), 1648.75);
        assert_eq!(bmr(30, 70.0, 175, false), 1482.75);
    }

    #[test]
    fn test_servings_to_grams() {
        assert_eq!(servings_to_grams(1.5), 150.0);
    }

    #[test]
    fn test_entry_total() {
        let json = r#"{
            "id": "00000000-0000-0000-0000-000000000001",
            "name": "Rice",
            "calories_per_100g": 130.0,
            "protein_per_100g": 2.7,
            "carbs_per_100g": 28.0,
            "fat_per_100g": 0.3,
            "fiber_per_100g": 0.4,
            "sugar_per_100g": 0.1,
            "grams": 200.0,
            "date": "2024-05-03T12:00:00Z",
            "input_mode": "grams"
        }"#;
        assert_eq!(entry_total(json).ok(), Some(260.0));
    }

    #[test]
    fn test_progress_state() {
        let view: serde_json::Value = serde_json::from_str(&progress_state(Some(2000.0), 1900.0)).unwrap();
        assert_eq!(view["state"], "almost_complete");

        let view: serde_json::Value = serde_json::from_str(&progress_state(None, 500.0)).unwrap();
        assert_eq!(view["state"], "no_target");

        let view: serde_json::Value = serde_json::from_str(&progress_state(Some(2000.0), 2500.0)).unwrap();
        assert_eq!(view["state"], "over_budget");
        assert_eq!(view["display_ratio"], 1.0);
    }
}

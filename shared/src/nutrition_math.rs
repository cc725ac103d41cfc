//! Nutrition math module
//!
//! Provides the energy and macronutrient target calculations derived from a
//! user profile: BMR, activity multiplier, goal adjustment, daily calorie
//! target, and per-macro gram targets.
//!
//! # Design Principles
//!
//! 1. **Pure Functions**: All calculations are pure, no side effects
//! 2. **Explicit Inputs**: The profile is always passed in, never looked up
//! 3. **No Clamping**: Targets are reported as computed, even when very low

use serde::{Deserialize, Serialize};

// ============================================================================
// User Profile Types
// ============================================================================

/// Gender used by the BMR equation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// Activity level for TDEE calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    #[default]
    LightlyActive,
    /// Moderate exercise 3-5 days/week
    ModeratelyActive,
    /// Hard exercise 6-7 days/week
    VeryActive,
    /// Very hard exercise, physical job
    ExtraActive,
}

impl ActivityLevel {
    /// Get the activity multiplier for TDEE calculation
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtraActive => 1.9,
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Little or no exercise",
            ActivityLevel::LightlyActive => "Light exercise 1-3 days/week",
            ActivityLevel::ModeratelyActive => "Moderate exercise 3-5 days/week",
            ActivityLevel::VeryActive => "Hard exercise 6-7 days/week",
            ActivityLevel::ExtraActive => "Very hard exercise or physical job",
        }
    }
}

impl std::str::FromStr for ActivityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "lightly_active" | "light" => Ok(ActivityLevel::LightlyActive),
            "moderately_active" | "moderate" => Ok(ActivityLevel::ModeratelyActive),
            "very_active" | "very" => Ok(ActivityLevel::VeryActive),
            "extra_active" | "extra" => Ok(ActivityLevel::ExtraActive),
            _ => Err(format!("Unknown activity level: {}", s)),
        }
    }
}

/// Weight goal, each with a fixed daily calorie delta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeightGoal {
    LoseFast,
    LoseSlow,
    #[default]
    Maintain,
    GainSlow,
    GainFast,
}

impl WeightGoal {
    /// Daily calorie adjustment in kcal applied on top of TDEE
    pub fn calorie_adjustment(&self) -> f64 {
        match self {
            WeightGoal::LoseFast => -1000.0,
            WeightGoal::LoseSlow => -500.0,
            WeightGoal::Maintain => 0.0,
            WeightGoal::GainSlow => 500.0,
            WeightGoal::GainFast => 1000.0,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            WeightGoal::LoseFast => "Lose 1 kg per week",
            WeightGoal::LoseSlow => "Lose 0.5 kg per week",
            WeightGoal::Maintain => "Maintain weight",
            WeightGoal::GainSlow => "Gain 0.5 kg per week",
            WeightGoal::GainFast => "Gain 1 kg per week",
        }
    }
}

impl std::str::FromStr for WeightGoal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "lose_fast" => Ok(WeightGoal::LoseFast),
            "lose_slow" => Ok(WeightGoal::LoseSlow),
            "maintain" => Ok(WeightGoal::Maintain),
            "gain_slow" => Ok(WeightGoal::GainSlow),
            "gain_fast" => Ok(WeightGoal::GainFast),
            _ => Err(format!("Unknown goal: {}", s)),
        }
    }
}

/// User profile data needed for target calculations
///
/// Construct through [`crate::validation::validate_profile`] when the values
/// come from user input; the invariant is that all numeric fields are > 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Age in years
    pub age_years: u32,
    /// Body weight in kilograms
    pub weight_kg: f64,
    /// Height in centimeters
    pub height_cm: u32,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub goal: WeightGoal,
}

// ============================================================================
// BMR and Calorie Target
// ============================================================================

/// Calculate Basal Metabolic Rate using Mifflin-St Jeor equation
///
/// Men: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) + 5
/// Women: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) - 161
pub fn calculate_bmr(profile: &UserProfile) -> f64 {
    let base = 10.0 * profile.weight_kg + 6.25 * profile.height_cm as f64
        - 5.0 * profile.age_years as f64;
    match profile.gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    }
}

/// Activity multiplier lookup
pub fn activity_multiplier(level: ActivityLevel) -> f64 {
    level.multiplier()
}

/// Goal calorie adjustment lookup (kcal/day)
pub fn goal_adjustment(goal: WeightGoal) -> f64 {
    goal.calorie_adjustment()
}

/// Calculate Total Daily Energy Expenditure
///
/// TDEE = BMR × Activity Multiplier
pub fn calculate_tdee(profile: &UserProfile) -> f64 {
    calculate_bmr(profile) * activity_multiplier(profile.activity_level)
}

/// Daily calorie target = TDEE + goal adjustment
///
/// No floor is applied: an aggressive deficit on a small BMR can produce a
/// near-zero or negative target and that value is returned as is.
pub fn daily_calorie_target(profile: &UserProfile) -> f64 {
    calculate_tdee(profile) + goal_adjustment(profile.goal)
}

// ============================================================================
// Macro Targets
// ============================================================================

/// Energy density of protein (kcal/g)
pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
/// Energy density of carbohydrate (kcal/g)
pub const KCAL_PER_G_CARBS: f64 = 4.0;
/// Energy density of fat (kcal/g)
pub const KCAL_PER_G_FAT: f64 = 9.0;

/// Protein target per kg of body weight
pub const PROTEIN_G_PER_KG: f64 = 1.6;
/// Fat target per kg of body weight
pub const FAT_G_PER_KG: f64 = 0.9;
/// Fiber target per 1000 kcal of calorie target
pub const FIBER_G_PER_1000_KCAL: f64 = 14.0;

/// Daily calorie and macro targets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutritionTargets {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub fiber_g: f64,
}

/// Derive macro targets from a calorie target and body weight
///
/// Protein and fat are fixed per kg; carbs take whatever energy is left and
/// fiber scales with the calorie target. Carbs and fiber never go below zero.
pub fn calculate_macro_targets(calorie_target: f64, weight_kg: f64) -> NutritionTargets {
    let protein_g = PROTEIN_G_PER_KG * weight_kg;
    let fat_g = FAT_G_PER_KG * weight_kg;

    let remaining_kcal =
        calorie_target - protein_g * KCAL_PER_G_PROTEIN - fat_g * KCAL_PER_G_FAT;
    let carbs_g = (remaining_kcal / KCAL_PER_G_CARBS).max(0.0);
    let fiber_g = (calorie_target / 1000.0 * FIBER_G_PER_1000_KCAL).max(0.0);

    NutritionTargets {
        calories: calorie_target,
        protein_g,
        carbs_g,
        fat_g,
        fiber_g,
    }
}

/// Calculate the full target set for a profile
pub fn calculate_targets(profile: &UserProfile) -> NutritionTargets {
    calculate_macro_targets(daily_calorie_target(profile), profile.weight_kg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn profile(gender: Gender, activity_level: ActivityLevel, goal: WeightGoal) -> UserProfile {
        UserProfile {
            age_years: 30,
            weight_kg: 70.0,
            height_cm: 175,
            gender,
            activity_level,
            goal,
        }
    }

    // =========================================================================
    // BMR Tests
    // =========================================================================

    #[test]
    fn test_bmr_mifflin_exact() {
        let male = profile(Gender::Male, ActivityLevel::Sedentary, WeightGoal::Maintain);
        assert_eq!(calculate_bmr(&male), 1648.75);

        let female = profile(Gender::Female, ActivityLevel::Sedentary, WeightGoal::Maintain);
        assert_eq!(calculate_bmr(&female), 1482.75);
    }

    #[rstest]
    #[case(ActivityLevel::Sedentary, 1.2)]
    #[case(ActivityLevel::LightlyActive, 1.375)]
    #[case(ActivityLevel::ModeratelyActive, 1.55)]
    #[case(ActivityLevel::VeryActive, 1.725)]
    #[case(ActivityLevel::ExtraActive, 1.9)]
    fn test_activity_multiplier(#[case] level: ActivityLevel, #[case] expected: f64) {
        assert_eq!(activity_multiplier(level), expected);
    }

    #[rstest]
    #[case(WeightGoal::LoseFast, -1000.0)]
    #[case(WeightGoal::LoseSlow, -500.0)]
    #[case(WeightGoal::Maintain, 0.0)]
    #[case(WeightGoal::GainSlow, 500.0)]
    #[case(WeightGoal::GainFast, 1000.0)]
    fn test_goal_adjustment(#[case] goal: WeightGoal, #[case] expected: f64) {
        assert_eq!(goal_adjustment(goal), expected);
    }

    #[test]
    fn test_daily_target_moderate_maintain() {
        let p = profile(Gender::Male, ActivityLevel::ModeratelyActive, WeightGoal::Maintain);
        let target = daily_calorie_target(&p);
        assert!((target - 2555.5625).abs() < 1e-9);
    }

    #[test]
    fn test_daily_target_not_floored() {
        // Small elderly profile on an aggressive deficit
        let p = UserProfile {
            age_years: 90,
            weight_kg: 35.0,
            height_cm: 140,
            gender: Gender::Female,
            activity_level: ActivityLevel::Sedentary,
            goal: WeightGoal::LoseFast,
        };
        let target = daily_calorie_target(&p);
        // BMR = 350 + 875 - 450 - 161 = 614; 614 * 1.2 - 1000 = -263.2
        assert!((target - -263.2).abs() < 1e-9);
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("moderate".parse::<ActivityLevel>(), Ok(ActivityLevel::ModeratelyActive));
        assert_eq!("Very_Active".parse::<ActivityLevel>(), Ok(ActivityLevel::VeryActive));
        assert!("couch".parse::<ActivityLevel>().is_err());
        assert_eq!("lose-fast".parse::<WeightGoal>(), Ok(WeightGoal::LoseFast));
        assert_eq!("gain_slow".parse::<WeightGoal>(), Ok(WeightGoal::GainSlow));
        assert!("bulk".parse::<WeightGoal>().is_err());
    }

    // =========================================================================
    // Macro Target Tests
    // =========================================================================

    #[test]
    fn test_macro_targets() {
        let targets = calculate_macro_targets(2000.0, 70.0);
        // protein 112 g (448 kcal), fat 63 g (567 kcal) -> 985 kcal left for carbs
        assert!((targets.protein_g - 112.0).abs() < 1e-9);
        assert!((targets.fat_g - 63.0).abs() < 1e-9);
        assert!((targets.carbs_g - 246.25).abs() < 1e-9);
        assert!((targets.fiber_g - 28.0).abs() < 1e-9);
        assert_eq!(targets.calories, 2000.0);
    }

    #[test]
    fn test_macro_targets_never_negative() {
        let targets = calculate_macro_targets(-200.0, 80.0);
        assert_eq!(targets.carbs_g, 0.0);
        assert_eq!(targets.fiber_g, 0.0);
    }

    #[test]
    fn test_targets_follow_profile_changes() {
        let mut p = profile(Gender::Male, ActivityLevel::ModeratelyActive, WeightGoal::Maintain);
        let before = calculate_targets(&p);
        p.weight_kg = 80.0;
        let after = calculate_targets(&p);
        assert!(after.calories > before.calories);
        assert!(after.protein_g > before.protein_g);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: Male BMR exceeds female BMR by exactly 166 kcal
        #[test]
        fn prop_gender_offset(
            weight in 30.0f64..200.0,
            height in 120u32..220,
            age in 10u32..90
        ) {
            let mut p = profile(Gender::Male, ActivityLevel::Sedentary, WeightGoal::Maintain);
            p.weight_kg = weight;
            p.height_cm = height;
            p.age_years = age;
            let male = calculate_bmr(&p);
            p.gender = Gender::Female;
            let female = calculate_bmr(&p);
            prop_assert!((male - female - 166.0).abs() < 1e-9);
        }

        /// Property: Macro targets depend only on (calorie target, weight)
        #[test]
        fn prop_macro_targets_deterministic(
            calories in -1000.0f64..6000.0,
            weight in 30.0f64..200.0
        ) {
            let a = calculate_macro_targets(calories, weight);
            let b = calculate_macro_targets(calories, weight);
            prop_assert_eq!(a, b);
            prop_assert!(a.carbs_g >= 0.0);
            prop_assert!(a.fiber_g >= 0.0);
        }

        /// Property: Target ordering follows goal ordering
        #[test]
        fn prop_goal_ordering(weight in 40.0f64..150.0, age in 18u32..80) {
            let mut p = profile(Gender::Female, ActivityLevel::LightlyActive, WeightGoal::LoseFast);
            p.weight_kg = weight;
            p.age_years = age;
            let mut last = daily_calorie_target(&p);
            for goal in [WeightGoal::LoseSlow, WeightGoal::Maintain, WeightGoal::GainSlow, WeightGoal::GainFast] {
                p.goal = goal;
                let next = daily_calorie_target(&p);
                prop_assert!(next > last);
                last = next;
            }
        }
    }
}

//! Input validation functions
//!
//! Everything the user types arrives as text. This module turns that text
//! into typed profiles and food entries, refusing the ones that cannot be
//! created. The engine functions downstream assume validated input.

use crate::food::{FoodEntry, InputMode, NutritionRecord};
use crate::nutrition_math::{ActivityLevel, Gender, UserProfile, WeightGoal};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Validation Error
// ============================================================================

/// Validation error with field context
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[error("{display_label}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub display_label: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            display_label: get_field_display_label(field).to_string(),
        }
    }

    /// Format as user-friendly error message
    pub fn user_message(&self) -> String {
        format!("{}: {}", self.display_label, self.message)
    }
}

/// Map technical field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "name" => "Food Name",
        "calories" => "Calories",
        "protein" => "Protein",
        "carbs" => "Carbohydrates",
        "fat" => "Fat",
        "fiber" => "Fiber",
        "sugar" => "Sugar",
        "grams" => "Amount (g)",
        "servings" => "Servings",
        "quantity" => "Quantity",
        "input_mode" => "Input Mode",
        "age" => "Age",
        "weight" => "Weight",
        "height" => "Height",
        "gender" => "Gender",
        "activity_level" => "Activity Level",
        "goal" => "Goal",
        "barcode" => "Barcode",
        "query" => "Search",
        _ => field_name,
    }
}

// ============================================================================
// Numeric Parsing
// ============================================================================

/// Parse a decimal typed by the user. Accepts a comma as decimal separator.
///
/// Input that could be a thousands separator ("1,000", "1.000,5") is refused
/// rather than guessed.
fn parse_decimal(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let separators = text.matches([',', '.']).count();
    if separators > 1 {
        return None;
    }
    if let Some((_, fraction)) = text.split_once(',') {
        if fraction.len() == 3 && fraction.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
    }
    text.replace(',', ".").parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a required number; empty or unparseable text is an error
pub fn parse_required_number(field: &str, text: &str) -> Result<f64, ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }
    parse_decimal(text).ok_or_else(|| ValidationError::new(field, "must be a valid number"))
}

/// Parse a required number that must be > 0
pub fn parse_positive_number(field: &str, text: &str) -> Result<f64, ValidationError> {
    let value = parse_required_number(field, text)?;
    if value <= 0.0 {
        return Err(ValidationError::new(field, "must be greater than zero"));
    }
    Ok(value)
}

/// Parse an optional macro field; empty or unparseable text counts as 0
pub fn parse_optional_macro(text: &str) -> f64 {
    parse_decimal(text).unwrap_or(0.0)
}

/// Parse a required whole number that must be > 0
pub fn parse_positive_integer(field: &str, text: &str) -> Result<u32, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }
    match trimmed.parse::<u32>() {
        Ok(0) => Err(ValidationError::new(field, "must be greater than zero")),
        Ok(v) => Ok(v),
        Err(_) => Err(ValidationError::new(field, "must be a whole number")),
    }
}

// ============================================================================
// Lookup Validation
// ============================================================================

/// Validate a scanned barcode (EAN-8 up to GTIN-14, digits only)
pub fn validate_barcode(code: &str) -> Result<&str, ValidationError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(ValidationError::new("barcode", "is required"));
    }
    if !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::new("barcode", "must contain only digits"));
    }
    if !(8..=14).contains(&code.len()) {
        return Err(ValidationError::new("barcode", "must be 8 to 14 digits long"));
    }
    Ok(code)
}

/// Validate a food search query
pub fn validate_search_query(query: &str) -> Result<&str, ValidationError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(ValidationError::new("query", "cannot be empty"));
    }
    Ok(query)
}

// ============================================================================
// Profile Validation
// ============================================================================

/// Valid activity levels
pub const VALID_ACTIVITY_LEVELS: &[&str] = &[
    "sedentary",
    "lightly_active",
    "moderately_active",
    "very_active",
    "extra_active",
];

/// Valid gender values
pub const VALID_GENDERS: &[&str] = &["male", "female"];

/// Valid weight goals
pub const VALID_GOALS: &[&str] = &["lose_fast", "lose_slow", "maintain", "gain_slow", "gain_fast"];

/// Validate gender
pub fn validate_gender(gender: &str) -> Result<Gender, ValidationError> {
    match gender.trim().to_lowercase().as_str() {
        "male" => Ok(Gender::Male),
        "female" => Ok(Gender::Female),
        _ => Err(ValidationError::new(
            "gender",
            &format!("must be one of: {}", VALID_GENDERS.join(", ")),
        )),
    }
}

/// Validate activity level
pub fn validate_activity_level(level: &str) -> Result<ActivityLevel, ValidationError> {
    level.parse().map_err(|_| {
        ValidationError::new(
            "activity_level",
            &format!("must be one of: {}", VALID_ACTIVITY_LEVELS.join(", ")),
        )
    })
}

/// Validate weight goal
pub fn validate_goal(goal: &str) -> Result<WeightGoal, ValidationError> {
    goal.parse().map_err(|_| {
        ValidationError::new("goal", &format!("must be one of: {}", VALID_GOALS.join(", ")))
    })
}

/// Profile as typed on the onboarding or edit screen
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileForm {
    pub age: String,
    pub weight: String,
    pub height: String,
    pub gender: String,
    pub activity_level: String,
    pub goal: String,
}

/// Validate a profile form; all numeric fields must be > 0
pub fn validate_profile(form: &ProfileForm) -> Result<UserProfile, ValidationError> {
    Ok(UserProfile {
        age_years: parse_positive_integer("age", &form.age)?,
        weight_kg: parse_positive_number("weight", &form.weight)?,
        height_cm: parse_positive_integer("height", &form.height)?,
        gender: validate_gender(&form.gender)?,
        activity_level: validate_activity_level(&form.activity_level)?,
        goal: validate_goal(&form.goal)?,
    })
}

/// Check an already-typed profile against the same rules
pub fn check_profile(profile: &UserProfile) -> Result<(), ValidationError> {
    if profile.age_years == 0 {
        return Err(ValidationError::new("age", "must be greater than zero"));
    }
    if !profile.weight_kg.is_finite() || profile.weight_kg <= 0.0 {
        return Err(ValidationError::new("weight", "must be greater than zero"));
    }
    if profile.height_cm == 0 {
        return Err(ValidationError::new("height", "must be greater than zero"));
    }
    Ok(())
}

// ============================================================================
// Food Entry Validation
// ============================================================================

/// Manual food entry as typed by the user
///
/// In grams mode the nutrient fields are per 100 g and `quantity` is grams;
/// in servings mode they are per serving and `quantity` is the serving count.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoodEntryForm {
    pub name: String,
    pub calories: String,
    #[serde(default)]
    pub protein: String,
    #[serde(default)]
    pub carbs: String,
    #[serde(default)]
    pub fat: String,
    #[serde(default)]
    pub fiber: String,
    #[serde(default)]
    pub sugar: String,
    pub quantity: String,
    #[serde(default)]
    pub input_mode: InputMode,
}

/// Build a food entry from a manual entry form
///
/// Name, calories and quantity are required. Optional macros that are empty
/// or unparseable count as 0.
pub fn parse_food_entry(
    form: &FoodEntryForm,
    date: DateTime<Utc>,
) -> Result<FoodEntry, ValidationError> {
    let name = form.name.trim();
    if name.is_empty() {
        return Err(ValidationError::new("name", "is required"));
    }

    let calories = parse_required_number("calories", &form.calories)?;
    if calories < 0.0 {
        return Err(ValidationError::new("calories", "cannot be negative"));
    }

    let quantity_field = match form.input_mode {
        InputMode::Grams => "grams",
        InputMode::Servings => "servings",
    };
    let quantity = parse_positive_number(quantity_field, &form.quantity)?;

    let source = NutritionRecord {
        name: name.to_string(),
        brand: None,
        barcode: None,
        calories_per_100g: calories,
        protein_per_100g: parse_optional_macro(&form.protein),
        carbs_per_100g: parse_optional_macro(&form.carbs),
        fat_per_100g: parse_optional_macro(&form.fat),
        fiber_per_100g: parse_optional_macro(&form.fiber),
        sugar_per_100g: parse_optional_macro(&form.sugar),
    };

    match form.input_mode {
        InputMode::Grams => FoodEntry::from_grams(&source, quantity, date),
        InputMode::Servings => FoodEntry::from_servings(&source, quantity, date),
    }
}

//! Food entry model
//!
//! A [`FoodEntry`] is one logged occurrence of a food. Nutrient values are
//! always stored on a per-100g basis together with the resolved gram
//! quantity; totals are derived on demand.

use crate::validation::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use uuid::Uuid;

/// Gram weight one serving is normalized to when logging in servings mode
pub const SERVING_NORMALIZATION_GRAMS: f64 = 100.0;

// ============================================================================
// Per-100g nutrient profile
// ============================================================================

/// Nutrient density on a 100 g basis
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Per100g {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
    pub sugar: f64,
}

impl Per100g {
    /// Scale to the totals contained in `grams` of the food
    pub fn for_grams(&self, grams: f64) -> NutrientTotals {
        NutrientTotals {
            calories: self.calories * grams / 100.0,
            protein: self.protein * grams / 100.0,
            carbs: self.carbs * grams / 100.0,
            fat: self.fat * grams / 100.0,
            fiber: self.fiber * grams / 100.0,
            sugar: self.sugar * grams / 100.0,
        }
    }
}

/// Anything that can be logged as food: manual input, a lookup record,
/// a quick-add template or a previous entry.
pub trait FoodSource {
    fn name(&self) -> &str;
    fn per_100g(&self) -> Per100g;
}

// ============================================================================
// Totals
// ============================================================================

/// Absolute nutrient amounts (kcal for calories, grams for the rest)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NutrientTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
    pub sugar: f64,
}

impl Add for NutrientTotals {
    type Output = NutrientTotals;

    fn add(self, rhs: NutrientTotals) -> NutrientTotals {
        NutrientTotals {
            calories: self.calories + rhs.calories,
            protein: self.protein + rhs.protein,
            carbs: self.carbs + rhs.carbs,
            fat: self.fat + rhs.fat,
            fiber: self.fiber + rhs.fiber,
            sugar: self.sugar + rhs.sugar,
        }
    }
}

impl AddAssign for NutrientTotals {
    fn add_assign(&mut self, rhs: NutrientTotals) {
        *self = *self + rhs;
    }
}

impl Sum for NutrientTotals {
    fn sum<I: Iterator<Item = NutrientTotals>>(iter: I) -> Self {
        iter.fold(NutrientTotals::default(), Add::add)
    }
}

// ============================================================================
// Food Entry
// ============================================================================

/// How the quantity of an entry was entered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    #[default]
    Grams,
    Servings,
}

impl std::str::FromStr for InputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "grams" | "g" => Ok(InputMode::Grams),
            "servings" | "serving" => Ok(InputMode::Servings),
            _ => Err(format!("Unknown input mode: {}", s)),
        }
    }
}

/// One logged food occurrence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodEntry {
    pub id: Uuid,
    pub name: String,
    pub calories_per_100g: f64,
    pub protein_per_100g: f64,
    pub carbs_per_100g: f64,
    pub fat_per_100g: f64,
    pub fiber_per_100g: f64,
    pub sugar_per_100g: f64,
    /// Resolved total weight consumed, regardless of input mode
    pub grams: f64,
    pub date: DateTime<Utc>,
    pub input_mode: InputMode,
    /// Grams per serving; only set for servings mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serving_size: Option<f64>,
}

impl FoodEntry {
    fn new(
        source: &impl FoodSource,
        grams: f64,
        date: DateTime<Utc>,
        input_mode: InputMode,
        serving_size: Option<f64>,
    ) -> Self {
        let p = source.per_100g();
        Self {
            id: Uuid::new_v4(),
            name: source.name().trim().to_string(),
            calories_per_100g: p.calories,
            protein_per_100g: p.protein,
            carbs_per_100g: p.carbs,
            fat_per_100g: p.fat,
            fiber_per_100g: p.fiber,
            sugar_per_100g: p.sugar,
            grams,
            date,
            input_mode,
            serving_size,
        }
    }

    /// Log `grams` of a food whose values are already per 100 g
    pub fn from_grams(
        source: &impl FoodSource,
        grams: f64,
        date: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        validate_source(source)?;
        validate_quantity("grams", grams)?;
        Ok(Self::new(source, grams, date, InputMode::Grams, None))
    }

    /// Log a number of servings.
    ///
    /// The per-serving values of `source` are stored as the per-100g values
    /// and one serving counts as [`SERVING_NORMALIZATION_GRAMS`], so
    /// `grams = servings * 100`.
    pub fn from_servings(
        source: &impl FoodSource,
        servings: f64,
        date: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        validate_source(source)?;
        validate_quantity("servings", servings)?;
        Ok(Self::new(
            source,
            servings * SERVING_NORMALIZATION_GRAMS,
            date,
            InputMode::Servings,
            Some(SERVING_NORMALIZATION_GRAMS),
        ))
    }

    /// Same entry with a new portion size
    pub fn with_grams(&self, grams: f64) -> Result<Self, ValidationError> {
        validate_quantity("grams", grams)?;
        Ok(Self {
            grams,
            ..self.clone()
        })
    }

    /// Number of servings for servings-mode entries
    pub fn servings(&self) -> Option<f64> {
        match (self.input_mode, self.serving_size) {
            (InputMode::Servings, Some(size)) if size > 0.0 => Some(self.grams / size),
            _ => None,
        }
    }

    pub fn totals(&self) -> NutrientTotals {
        self.per_100g().for_grams(self.grams)
    }

    pub fn total_calories(&self) -> f64 {
        self.calories_per_100g * self.grams / 100.0
    }

    pub fn total_protein(&self) -> f64 {
        self.protein_per_100g * self.grams / 100.0
    }

    pub fn total_carbs(&self) -> f64 {
        self.carbs_per_100g * self.grams / 100.0
    }

    pub fn total_fat(&self) -> f64 {
        self.fat_per_100g * self.grams / 100.0
    }

    pub fn total_fiber(&self) -> f64 {
        self.fiber_per_100g * self.grams / 100.0
    }

    pub fn total_sugar(&self) -> f64 {
        self.sugar_per_100g * self.grams / 100.0
    }
}

impl FoodSource for FoodEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn per_100g(&self) -> Per100g {
        Per100g {
            calories: self.calories_per_100g,
            protein: self.protein_per_100g,
            carbs: self.carbs_per_100g,
            fat: self.fat_per_100g,
            fiber: self.fiber_per_100g,
            sugar: self.sugar_per_100g,
        }
    }
}

fn validate_source(source: &impl FoodSource) -> Result<(), ValidationError> {
    if source.name().trim().is_empty() {
        return Err(ValidationError::new("name", "cannot be empty"));
    }
    let p = source.per_100g();
    let fields = [
        ("calories", p.calories),
        ("protein", p.protein),
        ("carbs", p.carbs),
        ("fat", p.fat),
        ("fiber", p.fiber),
        ("sugar", p.sugar),
    ];
    for (field, value) in fields {
        if !value.is_finite() || value < 0.0 {
            return Err(ValidationError::new(field, "must be a non-negative number"));
        }
    }
    Ok(())
}

fn validate_quantity(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::new(field, "must be a positive number"));
    }
    Ok(())
}

// ============================================================================
// Lookup records
// ============================================================================

/// Normalized nutrition record from a barcode or search lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    pub calories_per_100g: f64,
    pub protein_per_100g: f64,
    pub carbs_per_100g: f64,
    pub fat_per_100g: f64,
    pub fiber_per_100g: f64,
    pub sugar_per_100g: f64,
}

impl NutritionRecord {
    /// Clean up a record from an untrusted source: trims text and replaces
    /// missing, negative or non-finite values with 0.
    pub fn normalized(self) -> Self {
        fn clean(v: f64) -> f64 {
            if v.is_finite() && v > 0.0 {
                v
            } else {
                0.0
            }
        }
        Self {
            name: self.name.trim().to_string(),
            brand: self
                .brand
                .map(|b| b.trim().to_string())
                .filter(|b| !b.is_empty()),
            barcode: self.barcode,
            calories_per_100g: clean(self.calories_per_100g),
            protein_per_100g: clean(self.protein_per_100g),
            carbs_per_100g: clean(self.carbs_per_100g),
            fat_per_100g: clean(self.fat_per_100g),
            fiber_per_100g: clean(self.fiber_per_100g),
            sugar_per_100g: clean(self.sugar_per_100g),
        }
    }
}

impl FoodSource for NutritionRecord {
    fn name(&self) -> &str {
        &self.name
    }

    fn per_100g(&self) -> Per100g {
        Per100g {
            calories: self.calories_per_100g,
            protein: self.protein_per_100g,
            carbs: self.carbs_per_100g,
            fat: self.fat_per_100g,
            fiber: self.fiber_per_100g,
            sugar: self.sugar_per_100g,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(name: &str, calories: f64) -> NutritionRecord {
        NutritionRecord {
            name: name.to_string(),
            brand: None,
            barcode: None,
            calories_per_100g: calories,
            protein_per_100g: 10.0,
            carbs_per_100g: 20.0,
            fat_per_100g: 5.0,
            fiber_per_100g: 2.0,
            sugar_per_100g: 4.0,
        }
    }

    #[test]
    fn test_entry_totals() {
        let entry = FoodEntry::from_grams(&record("Rice", 200.0), 150.0, Utc::now()).unwrap();
        assert_eq!(entry.total_calories(), 300.0);
        assert_eq!(entry.total_protein(), 15.0);
        assert_eq!(entry.total_carbs(), 30.0);
        assert_eq!(entry.total_fat(), 7.5);
        assert_eq!(entry.total_fiber(), 3.0);
        assert_eq!(entry.total_sugar(), 6.0);
        assert_eq!(entry.totals().calories, 300.0);
        assert_eq!(entry.input_mode, InputMode::Grams);
        assert!(entry.serving_size.is_none());
    }

    #[test]
    fn test_zero_entry_has_zero_totals() {
        let mut entry = FoodEntry::from_grams(&record("Water", 0.0), 1.0, Utc::now()).unwrap();
        entry.grams = 0.0;
        assert_eq!(entry.total_calories(), 0.0);
        assert!(!entry.total_calories().is_nan());
    }

    #[test]
    fn test_servings_normalized_to_100g() {
        let entry = FoodEntry::from_servings(&record("Bar", 250.0), 2.0, Utc::now()).unwrap();
        assert_eq!(entry.grams, 200.0);
        assert_eq!(entry.calories_per_100g, 250.0);
        assert_eq!(entry.total_calories(), 500.0);
        assert_eq!(entry.input_mode, InputMode::Servings);
        assert_eq!(entry.serving_size, Some(100.0));
        assert_eq!(entry.servings(), Some(2.0));
    }

    #[test]
    fn test_rejects_invalid_quantities() {
        let source = record("Oats", 380.0);
        assert!(FoodEntry::from_grams(&source, 0.0, Utc::now()).is_err());
        assert!(FoodEntry::from_grams(&source, -5.0, Utc::now()).is_err());
        assert!(FoodEntry::from_grams(&source, f64::NAN, Utc::now()).is_err());
        assert!(FoodEntry::from_servings(&source, 0.0, Utc::now()).is_err());
    }

    #[test]
    fn test_rejects_empty_name_and_negative_values() {
        let err = FoodEntry::from_grams(&record("  ", 100.0), 100.0, Utc::now()).unwrap_err();
        assert_eq!(err.field, "name");

        let err = FoodEntry::from_grams(&record("Bad", -1.0), 100.0, Utc::now()).unwrap_err();
        assert_eq!(err.field, "calories");
    }

    #[test]
    fn test_with_grams_recomputes_totals() {
        let entry = FoodEntry::from_grams(&record("Pasta", 160.0), 100.0, Utc::now()).unwrap();
        let edited = entry.with_grams(250.0).unwrap();
        assert_eq!(edited.id, entry.id);
        assert_eq!(edited.total_calories(), 400.0);
        assert!(entry.with_grams(0.0).is_err());
    }

    #[test]
    fn test_record_normalization() {
        let mut raw = record("  Yogurt ", f64::NAN);
        raw.brand = Some("   ".to_string());
        raw.sugar_per_100g = -3.0;
        let clean = raw.normalized();
        assert_eq!(clean.name, "Yogurt");
        assert_eq!(clean.brand, None);
        assert_eq!(clean.calories_per_100g, 0.0);
        assert_eq!(clean.sugar_per_100g, 0.0);
        assert_eq!(clean.protein_per_100g, 10.0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: Totals scale linearly with grams
        #[test]
        fn prop_totals_linear_in_grams(
            calories in 0.0f64..900.0,
            grams in 1.0f64..1000.0
        ) {
            let source = record("Food", calories);
            let single = FoodEntry::from_grams(&source, grams, Utc::now()).unwrap();
            let double = single.with_grams(grams * 2.0).unwrap();
            prop_assert!((double.total_calories() - 2.0 * single.total_calories()).abs() < 1e-9);
        }

        /// Property: Servings mode equals grams mode at 100 g per serving
        #[test]
        fn prop_servings_match_grams(calories in 0.0f64..900.0, servings in 0.1f64..10.0) {
            let source = record("Food", calories);
            let by_serving = FoodEntry::from_servings(&source, servings, Utc::now()).unwrap();
            let by_grams = FoodEntry::from_grams(&source, servings * 100.0, Utc::now()).unwrap();
            prop_assert_eq!(by_serving.totals(), by_grams.totals());
        }
    }
}

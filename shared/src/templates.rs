//! Quick-add templates
//!
//! Templates are regenerated from the full entry history: entries with the
//! same name and the same calorie/protein/carb/fat density collapse into one
//! template. Matching is exact, so values that differ by a rounding error
//! stay separate.

use crate::food::{FoodEntry, FoodSource, InputMode, Per100g};
use crate::validation::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashMap;

/// Grouping key: name plus four per-100g values compared exactly
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateKey {
    name: String,
    calories: u64,
    protein: u64,
    carbs: u64,
    fat: u64,
}

/// Bit pattern for exact comparison; -0.0 and 0.0 map to the same key
fn key_bits(value: f64) -> u64 {
    if value == 0.0 {
        0
    } else {
        value.to_bits()
    }
}

impl TemplateKey {
    pub fn of(source: &impl FoodSource) -> Self {
        let p = source.per_100g();
        Self::from_parts(source.name(), p.calories, p.protein, p.carbs, p.fat)
    }

    pub fn from_parts(name: &str, calories: f64, protein: f64, carbs: f64, fat: f64) -> Self {
        Self {
            name: name.to_string(),
            calories: key_bits(calories),
            protein: key_bits(protein),
            carbs: key_bits(carbs),
            fat: key_bits(fat),
        }
    }
}

/// Reusable food derived from past entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodTemplate {
    pub name: String,
    pub calories_per_100g: f64,
    pub protein_per_100g: f64,
    pub carbs_per_100g: f64,
    pub fat_per_100g: f64,
    pub fiber_per_100g: f64,
    pub sugar_per_100g: f64,
    pub input_mode: InputMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serving_size: Option<f64>,
    pub times_used: usize,
    pub last_used: DateTime<Utc>,
}

impl FoodTemplate {
    fn from_entry(entry: &FoodEntry) -> Self {
        Self {
            name: entry.name.clone(),
            calories_per_100g: entry.calories_per_100g,
            protein_per_100g: entry.protein_per_100g,
            carbs_per_100g: entry.carbs_per_100g,
            fat_per_100g: entry.fat_per_100g,
            fiber_per_100g: entry.fiber_per_100g,
            sugar_per_100g: entry.sugar_per_100g,
            input_mode: entry.input_mode,
            serving_size: entry.serving_size,
            times_used: 0,
            last_used: entry.date,
        }
    }

    pub fn key(&self) -> TemplateKey {
        TemplateKey::of(self)
    }

    /// Case-insensitive substring match on the name
    pub fn matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.trim().to_lowercase())
    }

    /// Log this template again with a new quantity
    ///
    /// `quantity` is grams or a serving count depending on `mode`; when no
    /// mode is given the template's own input mode is used.
    pub fn to_entry(
        &self,
        mode: Option<InputMode>,
        quantity: f64,
        date: DateTime<Utc>,
    ) -> Result<FoodEntry, ValidationError> {
        match mode.unwrap_or(self.input_mode) {
            InputMode::Grams => FoodEntry::from_grams(self, quantity, date),
            InputMode::Servings => FoodEntry::from_servings(self, quantity, date),
        }
    }
}

impl FoodSource for FoodTemplate {
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

/// Collapse the entry history into templates, most recently used first
///
/// The first entry seen for a key supplies the template's values. Templates
/// with the same `last_used` keep the order their first entries appeared in.
pub fn build_templates<E>(entries: impl IntoIterator<Item = E>) -> Vec<FoodTemplate>
where
    E: Borrow<FoodEntry>,
{
    let mut index: HashMap<TemplateKey, usize> = HashMap::new();
    let mut templates: Vec<FoodTemplate> = Vec::new();

    for entry in entries {
        let entry = entry.borrow();
        let slot = *index.entry(TemplateKey::of(entry)).or_insert_with(|| {
            templates.push(FoodTemplate::from_entry(entry));
            templates.len() - 1
        });
        let template = &mut templates[slot];
        template.times_used += 1;
        if entry.date > template.last_used {
            template.last_used = entry.date;
        }
    }

    templates.sort_by(|a, b| b.last_used.cmp(&a.last_used));
    templates
}

/// Templates whose name contains `query`; an empty query matches everything
pub fn search_templates<'a>(templates: &'a [FoodTemplate], query: &str) -> Vec<&'a FoodTemplate> {
    templates.iter().filter(|t| t.matches(query)).collect()
}

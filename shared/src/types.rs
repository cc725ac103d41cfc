//! API request and response types

use crate::aggregation::DailySummary;
use crate::food::{FoodEntry, InputMode, NutrientTotals};
use crate::nutrition_math::{NutritionTargets, UserProfile};
use crate::targets::{DailyProgress, StepProgress};
use crate::validation::FoodEntryForm;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

// ============================================================================
// Profile
// ============================================================================

/// Profile with its derived targets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub profile: UserProfile,
    pub bmr: f64,
    pub tdee: f64,
    pub targets: NutritionTargets,
}

// ============================================================================
// Food Entries
// ============================================================================

/// Query selecting a calendar day (defaults to today)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DateQuery {
    pub date: Option<NaiveDate>,
}

/// Inclusive date range
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Food entry with its derived totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodEntryResponse {
    #[serde(flatten)]
    pub entry: FoodEntry,
    pub totals: NutrientTotals,
}

impl From<FoodEntry> for FoodEntryResponse {
    fn from(entry: FoodEntry) -> Self {
        let totals = entry.totals();
        Self { entry, totals }
    }
}

/// Manual food entry, optionally backdated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntryRequest {
    #[serde(flatten)]
    pub form: FoodEntryForm,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// Change the portion of an existing entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditPortionRequest {
    /// New gram amount, as typed
    pub grams: String,
}

/// Re-log a template identified by name and macro density
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickAddRequest {
    pub name: String,
    pub calories_per_100g: f64,
    pub protein_per_100g: f64,
    pub carbs_per_100g: f64,
    pub fat_per_100g: f64,
    /// Grams or serving count, as typed
    pub quantity: String,
    #[serde(default)]
    pub input_mode: Option<InputMode>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// Template search query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateQuery {
    #[serde(default)]
    pub q: Option<String>,
}

// ============================================================================
// Progress
// ============================================================================

/// Everything the daily dashboard shows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyProgressResponse {
    pub summary: DailySummary,
    pub progress: DailyProgress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<StepProgress>,
}

// ============================================================================
// Food Lookup
// ============================================================================

/// Food database search query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodSearchQuery {
    pub q: String,
    #[serde(default)]
    pub limit: Option<u32>,
}

// ============================================================================
// Steps
// ============================================================================

/// Step count query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepQuery {
    /// Bypass the cache
    #[serde(default)]
    pub refresh: bool,
}

/// Device sync of today's step count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepSyncRequest {
    pub steps: u32,
}

/// Step count response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepCountResponse {
    pub steps: u32,
    pub fetched_at: DateTime<Utc>,
    pub progress: StepProgress,
}

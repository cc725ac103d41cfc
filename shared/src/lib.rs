//! Macro Tracker Shared Library
//!
//! The nutrition target and aggregation engine, shared by the backend and
//! the WASM module. Everything here is pure: callers pass in snapshots of
//! the profile and the logged entries and get derived values back.

pub mod aggregation;
pub mod errors;
pub mod food;
pub mod nutrition_math;
pub mod targets;
pub mod templates;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use aggregation::{filter_for_date, summarize_day, DailySummary, DayCalendar};
pub use errors::*;
pub use food::{FoodEntry, FoodSource, InputMode, NutrientTotals, NutritionRecord, Per100g};
pub use nutrition_math::*;
pub use targets::*;
pub use templates::{build_templates, search_templates, FoodTemplate, TemplateKey};
pub use validation::ValidationError;

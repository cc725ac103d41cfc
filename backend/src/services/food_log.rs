//! Food log service - logging, editing and quick-add

use crate::error::ApiError;
use crate::repositories::NutritionStore;
use chrono::{NaiveDate, Utc};
use macro_tracker_shared::aggregation::filter_for_date;
use macro_tracker_shared::types::{EditPortionRequest, LogEntryRequest, QuickAddRequest};
use macro_tracker_shared::validation::{parse_food_entry, parse_positive_number};
use macro_tracker_shared::{
    build_templates, search_templates, DayCalendar, FoodEntry, FoodTemplate, InputMode, TemplateKey,
};
use tracing::{debug, info};
use uuid::Uuid;

/// Food log service
pub struct FoodLogService;

impl FoodLogService {
    /// Validate and log a manually entered food
    pub async fn log_entry(
        store: &dyn NutritionStore,
        req: &LogEntryRequest,
    ) -> Result<FoodEntry, ApiError> {
        let date = req.date.unwrap_or_else(Utc::now);
        let entry = parse_food_entry(&req.form, date)?;
        store.insert_entry(entry.clone()).await?;

        info!(
            entry_id = %entry.id,
            input_mode = ?entry.input_mode,
            calories = entry.total_calories(),
            "Food logged"
        );
        Ok(entry)
    }

    /// Entries that fall on `date`, in logging order
    pub async fn entries_for_date(
        store: &dyn NutritionStore,
        date: NaiveDate,
        calendar: &DayCalendar,
    ) -> Result<Vec<FoodEntry>, ApiError> {
        let entries = store.list_entries().await?;
        Ok(filter_for_date(entries, date, calendar))
    }

    /// Change the gram amount of an entry; everything else stays the same
    pub async fn edit_portion(
        store: &dyn NutritionStore,
        id: Uuid,
        req: &EditPortionRequest,
    ) -> Result<FoodEntry, ApiError> {
        let grams = parse_positive_number("grams", &req.grams)?;
        let entry = store
            .get_entry(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Entry {id} not found")))?;

        let edited = entry.with_grams(grams)?;
        if !store.update_entry(edited.clone()).await? {
            return Err(ApiError::NotFound(format!("Entry {id} not found")));
        }

        debug!(entry_id = %id, from = entry.grams, to = grams, "Portion edited");
        Ok(edited)
    }

    pub async fn delete_entry(store: &dyn NutritionStore, id: Uuid) -> Result<(), ApiError> {
        if !store.delete_entry(id).await? {
            return Err(ApiError::NotFound(format!("Entry {id} not found")));
        }
        info!(entry_id = %id, "Entry deleted");
        Ok(())
    }

    /// Quick-add templates from the full history, optionally filtered by name
    ///
    /// Regeneration walks every entry ever logged, so it runs on the blocking
    /// pool over an owned snapshot.
    pub async fn templates(
        store: &dyn NutritionStore,
        query: Option<&str>,
    ) -> Result<Vec<FoodTemplate>, ApiError> {
        let entries = store.list_entries().await?;
        let count = entries.len();
        let templates = tokio::task::spawn_blocking(move || build_templates(&entries))
            .await
            .map_err(|e| ApiError::Internal(e.into()))?;
        debug!(entries = count, templates = templates.len(), "Templates rebuilt");

        Ok(match query.map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => search_templates(&templates, q).into_iter().cloned().collect(),
            None => templates,
        })
    }

    /// Log a template again with a new quantity
    pub async fn quick_add(
        store: &dyn NutritionStore,
        req: &QuickAddRequest,
    ) -> Result<FoodEntry, ApiError> {
        let key = TemplateKey::from_parts(
            req.name.trim(),
            req.calories_per_100g,
            req.protein_per_100g,
            req.carbs_per_100g,
            req.fat_per_100g,
        );
        let template = Self::templates(store, None)
            .await?
            .into_iter()
            .find(|t| t.key() == key)
            .ok_or_else(|| ApiError::NotFound(format!("No template for {}", req.name.trim())))?;

        let mode = req.input_mode.unwrap_or(template.input_mode);
        let field = match mode {
            InputMode::Grams => "grams",
            InputMode::Servings => "servings",
        };
        let quantity = parse_positive_number(field, &req.quantity)?;
        let entry = template.to_entry(Some(mode), quantity, req.date.unwrap_or_else(Utc::now))?;
        store.insert_entry(entry.clone()).await?;

        info!(
            entry_id = %entry.id,
            times_used = template.times_used + 1,
            "Template re-logged"
        );
        Ok(entry)
    }
}

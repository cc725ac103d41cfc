//! Progress service - daily totals against targets, and history

use crate::error::ApiError;
use crate::repositories::NutritionStore;
use crate::services::steps::StepCountCache;
use chrono::NaiveDate;
use macro_tracker_shared::aggregation::{history, summarize_day};
use macro_tracker_shared::types::DailyProgressResponse;
use macro_tracker_shared::{calculate_progress, step_progress, DailySummary, DayCalendar};
use tracing::{debug, warn};

/// Longest range the history endpoint serves
pub const MAX_HISTORY_DAYS: i64 = 366;

/// Progress service
pub struct ProgressService;

impl ProgressService {
    /// Totals and target progress for one day
    ///
    /// Steps are only attached for today; a step source failure is logged and
    /// the rest of the dashboard is still returned.
    pub async fn daily_progress(
        store: &dyn NutritionStore,
        steps: &StepCountCache,
        calendar: &DayCalendar,
        daily_step_goal: u32,
        date: NaiveDate,
    ) -> Result<DailyProgressResponse, ApiError> {
        let profile = store.get_profile().await?;
        let entries = store.list_entries().await?;

        let summary = summarize_day(&entries, date, calendar);
        let progress = calculate_progress(profile.as_ref(), &summary.totals);
        debug!(
            %date,
            entries = summary.entry_count,
            calories = summary.totals.calories,
            state = ?progress.calories.state,
            "Daily progress computed"
        );

        let steps = if date == calendar.today() {
            match steps.today(false).await {
                Ok(reading) => Some(step_progress(reading.steps, daily_step_goal)),
                Err(e) => {
                    warn!(error = %e, "Step count unavailable");
                    None
                }
            }
        } else {
            None
        };

        Ok(DailyProgressResponse {
            summary,
            progress,
            steps,
        })
    }

    /// One summary per day in `start..=end`, empty days included
    pub async fn history(
        store: &dyn NutritionStore,
        calendar: &DayCalendar,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailySummary>, ApiError> {
        if end < start {
            return Err(ApiError::BadRequest("end must not be before start".to_string()));
        }
        let days = (end - start).num_days() + 1;
        if days > MAX_HISTORY_DAYS {
            return Err(ApiError::BadRequest(format!(
                "History is limited to {MAX_HISTORY_DAYS} days, requested {days}"
            )));
        }

        let entries = store.list_entries().await?;
        Ok(history(&entries, start, end, calendar))
    }
}

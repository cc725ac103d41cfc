//! Target and progress calculation
//!
//! Combines the (optional) user profile with a day's totals. Without a
//! profile there is no target at all, which is reported as
//! [`ProgressState::NoTarget`] rather than as a target of zero that has been
//! reached.

use crate::food::NutrientTotals;
use crate::nutrition_math::{calculate_targets, NutritionTargets, UserProfile};
use serde::{Deserialize, Serialize};

/// Ratio from which intake counts as on track
pub const ON_TRACK_THRESHOLD: f64 = 0.75;
/// Ratio from which the target is almost complete
pub const ALMOST_COMPLETE_THRESHOLD: f64 = 0.90;

/// Display state of a progress bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressState {
    /// No profile, so no target to measure against
    NoTarget,
    /// Below 75% of target
    Normal,
    /// 75% up to 90%
    OnTrack,
    /// 90% up to and including 100%
    AlmostComplete,
    /// Strictly more than the target
    OverBudget,
}

/// Progress of one quantity against its daily target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub target: f64,
    pub eaten: f64,
    /// `target - eaten`; negative once over budget
    pub remaining: f64,
    /// Unclamped `eaten / target`, 0 when the target is not positive
    pub ratio: f64,
    pub state: ProgressState,
}

pub type CalorieProgress = Progress;
pub type MacroProgress = Progress;

impl Progress {
    /// Progress against a target; `None` means no target is defined
    pub fn new(target: Option<f64>, eaten: f64) -> Self {
        let Some(target) = target else {
            return Self {
                target: 0.0,
                eaten,
                remaining: 0.0,
                ratio: 0.0,
                state: ProgressState::NoTarget,
            };
        };

        let ratio = if target > 0.0 { eaten / target } else { 0.0 };
        let state = if eaten > target {
            ProgressState::OverBudget
        } else if ratio >= ALMOST_COMPLETE_THRESHOLD {
            ProgressState::AlmostComplete
        } else if ratio >= ON_TRACK_THRESHOLD {
            ProgressState::OnTrack
        } else {
            ProgressState::Normal
        };

        Self {
            target,
            eaten,
            remaining: target - eaten,
            ratio,
            state,
        }
    }

    /// Ratio clamped to [0, 1] for a progress bar
    pub fn display_ratio(&self) -> f64 {
        self.ratio.clamp(0.0, 1.0)
    }

    pub fn has_target(&self) -> bool {
        self.state != ProgressState::NoTarget
    }

    pub fn is_over_budget(&self) -> bool {
        self.state == ProgressState::OverBudget
    }
}

/// Calorie and macro progress for one day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyProgress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub targets: Option<NutritionTargets>,
    pub calories: CalorieProgress,
    pub protein: MacroProgress,
    pub carbs: MacroProgress,
    pub fat: MacroProgress,
    pub fiber: MacroProgress,
}

/// Compute the day's progress from an optional profile and the day's totals
///
/// Targets are derived from the profile on every call.
pub fn calculate_progress(profile: Option<&UserProfile>, totals: &NutrientTotals) -> DailyProgress {
    let targets = profile.map(calculate_targets);
    DailyProgress {
        targets,
        calories: Progress::new(targets.map(|t| t.calories), totals.calories),
        protein: Progress::new(targets.map(|t| t.protein_g), totals.protein),
        carbs: Progress::new(targets.map(|t| t.carbs_g), totals.carbs),
        fat: Progress::new(targets.map(|t| t.fat_g), totals.fat),
        fiber: Progress::new(targets.map(|t| t.fiber_g), totals.fiber),
    }
}

/// Step count against a daily goal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepProgress {
    pub steps: u32,
    pub goal: u32,
    /// Clamped to [0, 1]
    pub ratio: f64,
}

pub fn step_progress(steps: u32, goal: u32) -> StepProgress {
    let ratio = if goal == 0 {
        0.0
    } else {
        (steps as f64 / goal as f64).clamp(0.0, 1.0)
    };
    StepProgress { steps, goal, ratio }
}

//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.

use crate::config::AppConfig;
use crate::repositories::{InMemoryStore, NutritionStore};
use crate::services::{FoodLookup, OpenFoodFactsClient, StepCountCache, StoreStepSource};
use macro_tracker_shared::DayCalendar;
use std::sync::Arc;

/// Shared application state
///
/// Every field is behind an `Arc`, so cloning per request is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Profile, food log and step storage
    pub store: Arc<dyn NutritionStore>,
    /// Barcode and search lookups
    pub food_lookup: Arc<dyn FoodLookup>,
    /// Today's step count with freshness window
    pub steps: Arc<StepCountCache>,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Calendar that decides which day an entry belongs to
    pub calendar: DayCalendar,
}

impl AppState {
    /// Wire the state from explicit collaborators
    pub fn new(
        store: Arc<dyn NutritionStore>,
        food_lookup: Arc<dyn FoodLookup>,
        config: AppConfig,
    ) -> Self {
        let calendar = config.calendar.day_calendar();
        let steps = StepCountCache::new(
            Arc::new(StoreStepSource::new(store.clone())),
            calendar,
            config.steps.freshness(),
        );

        Self {
            store,
            food_lookup,
            steps: Arc::new(steps),
            config: Arc::new(config),
            calendar,
        }
    }

    /// State backed by the in-memory store and the Open Food Facts client
    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let food_lookup = OpenFoodFactsClient::new(&config.food_lookup)?;
        Ok(Self::new(
            Arc::new(InMemoryStore::new()),
            Arc::new(food_lookup),
            config,
        ))
    }

    /// Get a reference to the store
    #[inline]
    pub fn store(&self) -> &dyn NutritionStore {
        self.store.as_ref()
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

//! Data access layer
//!
//! The engine never persists anything itself; handlers read snapshots
//! through [`NutritionStore`] and hand them to the shared calculations.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use macro_tracker_shared::{FoodEntry, UserProfile};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod memory;

pub use memory::InMemoryStore;

/// Step count recorded for one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub date: NaiveDate,
    pub steps: u32,
    pub recorded_at: DateTime<Utc>,
}

/// Storage for the profile, the food log and synced step counts
#[async_trait]
pub trait NutritionStore: Send + Sync {
    async fn get_profile(&self) -> Result<Option<UserProfile>>;

    async fn save_profile(&self, profile: UserProfile) -> Result<()>;

    /// All entries in the order they were logged
    async fn list_entries(&self) -> Result<Vec<FoodEntry>>;

    async fn get_entry(&self, id: Uuid) -> Result<Option<FoodEntry>>;

    async fn insert_entry(&self, entry: FoodEntry) -> Result<()>;

    /// Replace an existing entry; false when the id is unknown
    async fn update_entry(&self, entry: FoodEntry) -> Result<bool>;

    /// False when the id is unknown
    async fn delete_entry(&self, id: Uuid) -> Result<bool>;

    async fn get_steps(&self, date: NaiveDate) -> Result<Option<StepRecord>>;

    async fn save_steps(&self, record: StepRecord) -> Result<()>;
}

//! In-memory store for a single user

use super::{NutritionStore, StepRecord};
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use macro_tracker_shared::{FoodEntry, UserProfile};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
struct Inner {
    profile: Option<UserProfile>,
    entries: Vec<FoodEntry>,
    steps: HashMap<NaiveDate, StepRecord>,
}

/// Process-local store; contents are lost on restart
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with a profile and entries
    pub fn with_data(profile: Option<UserProfile>, entries: Vec<FoodEntry>) -> Self {
        Self {
            inner: RwLock::new(Inner {
                profile,
                entries,
                steps: HashMap::new(),
            }),
        }
    }
}

#[async_trait]
impl NutritionStore for InMemoryStore {
    async fn get_profile(&self) -> Result<Option<UserProfile>> {
        Ok(self.inner.read().await.profile.clone())
    }

    async fn save_profile(&self, profile: UserProfile) -> Result<()> {
        self.inner.write().await.profile = Some(profile);
        Ok(())
    }

    async fn list_entries(&self) -> Result<Vec<FoodEntry>> {
        Ok(self.inner.read().await.entries.clone())
    }

    async fn get_entry(&self, id: Uuid) -> Result<Option<FoodEntry>> {
        let inner = self.inner.read().await;
        Ok(inner.entries.iter().find(|e| e.id == id).cloned())
    }

    async fn insert_entry(&self, entry: FoodEntry) -> Result<()> {
        let mut inner = self.inner.write().await;
        if inner.entries.iter().any(|e| e.id == entry.id) {
            anyhow::bail!("Duplicate entry id {}", entry.id);
        }
        inner.entries.push(entry);
        Ok(())
    }

    async fn update_entry(&self, entry: FoodEntry) -> Result<bool> {
        let mut inner = self.inner.write().await;
        match inner.entries.iter_mut().find(|e| e.id == entry.id) {
            Some(slot) => {
                *slot = entry;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_entry(&self, id: Uuid) -> Result<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.entries.len();
        inner.entries.retain(|e| e.id != id);
        Ok(inner.entries.len() != before)
    }

    async fn get_steps(&self, date: NaiveDate) -> Result<Option<StepRecord>> {
        Ok(self.inner.read().await.steps.get(&date).copied())
    }

    async fn save_steps(&self, record: StepRecord) -> Result<()> {
        self.inner.write().await.steps.insert(record.date, record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use macro_tracker_shared::NutritionRecord;

    fn entry(name: &str) -> FoodEntry {
        let source = NutritionRecord {
            name: name.to_string(),
            brand: None,
            barcode: None,
            calories_per_100g: 100.0,
            protein_per_100g: 5.0,
            carbs_per_100g: 10.0,
            fat_per_100g: 2.0,
            fiber_per_100g: 0.0,
            sugar_per_100g: 0.0,
        };
        FoodEntry::from_grams(&source, 100.0, Utc::now()).unwrap()
    }

    #[tokio::test]
    async fn test_entries_keep_insertion_order() {
        let store = InMemoryStore::new();
        store.insert_entry(entry("First")).await.unwrap();
        store.insert_entry(entry("Second")).await.unwrap();

        let names: Vec<_> = store
            .list_entries()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let store = InMemoryStore::new();
        let e = entry("Rice");
        store.insert_entry(e.clone()).await.unwrap();
        assert!(store.insert_entry(e).await.is_err());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = InMemoryStore::new();
        let e = entry("Rice");
        store.insert_entry(e.clone()).await.unwrap();

        let edited = e.with_grams(250.0).unwrap();
        assert!(store.update_entry(edited).await.unwrap());
        assert_eq!(store.get_entry(e.id).await.unwrap().unwrap().grams, 250.0);

        assert!(store.delete_entry(e.id).await.unwrap());
        assert!(!store.delete_entry(e.id).await.unwrap());
        assert!(store.get_entry(e.id).await.unwrap().is_none());
        assert!(!store.update_entry(e).await.unwrap());
    }

    #[tokio::test]
    async fn test_steps_per_day() {
        let store = InMemoryStore::new();
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let record = StepRecord {
            date,
            steps: 4200,
            recorded_at: Utc.with_ymd_and_hms(2024, 6, 1, 18, 0, 0).unwrap(),
        };
        store.save_steps(record).await.unwrap();

        assert_eq!(store.get_steps(date).await.unwrap(), Some(record));
        assert!(store.get_steps(date.succ_opt().unwrap()).await.unwrap().is_none());
    }
}

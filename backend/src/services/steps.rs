//! Step count source and cache
//!
//! The device step count is expensive to read, so it is cached for a short
//! freshness window. A forced refresh bypasses the cache, and a new
//! calendar day always triggers a refetch.

use crate::repositories::NutritionStore;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use macro_tracker_shared::DayCalendar;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Where today's step count comes from
#[async_trait]
pub trait StepCountSource: Send + Sync {
    /// Steps recorded on `date`; 0 when nothing has been synced
    async fn steps_on(&self, date: NaiveDate) -> Result<u32>;
}

/// Reads step counts synced into the store
pub struct StoreStepSource {
    store: Arc<dyn NutritionStore>,
}

impl StoreStepSource {
    pub fn new(store: Arc<dyn NutritionStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl StepCountSource for StoreStepSource {
    async fn steps_on(&self, date: NaiveDate) -> Result<u32> {
        Ok(self.store.get_steps(date).await?.map(|r| r.steps).unwrap_or(0))
    }
}

/// A step count as served to callers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReading {
    pub date: NaiveDate,
    pub steps: u32,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
struct CachedReading {
    reading: StepReading,
    fetched: Instant,
}

/// Single-slot cache in front of a [`StepCountSource`]
pub struct StepCountCache {
    source: Arc<dyn StepCountSource>,
    calendar: DayCalendar,
    freshness: Duration,
    slot: Mutex<Option<CachedReading>>,
}

impl StepCountCache {
    pub fn new(source: Arc<dyn StepCountSource>, calendar: DayCalendar, freshness: Duration) -> Self {
        Self {
            source,
            calendar,
            freshness,
            slot: Mutex::new(None),
        }
    }

    /// Today's step count, from cache when still fresh
    ///
    /// The slot stays locked while fetching, so concurrent callers share a
    /// single fetch. When a fetch fails, a stale reading from today is served
    /// instead; a forced refresh empties the slot first, so it has none.
    pub async fn today(&self, force_refresh: bool) -> Result<StepReading> {
        let today = self.calendar.today();
        let mut slot = self.slot.lock().await;

        if force_refresh {
            *slot = None;
        } else if let Some(cached) = slot.as_ref() {
            if cached.reading.date == today && cached.fetched.elapsed() < self.freshness {
                debug!(steps = cached.reading.steps, "Step count cache hit");
                return Ok(cached.reading);
            }
        }

        let steps = match self.source.steps_on(today).await {
            Ok(steps) => steps,
            Err(e) => {
                return match slot.as_ref().filter(|c| c.reading.date == today) {
                    Some(stale) => {
                        warn!(
                            error = %e,
                            steps = stale.reading.steps,
                            "Step fetch failed, serving stale count"
                        );
                        Ok(stale.reading)
                    }
                    None => Err(e),
                };
            }
        };
        let reading = StepReading {
            date: today,
            steps,
            fetched_at: Utc::now(),
        };
        debug!(steps, force_refresh, "Step count fetched");

        *slot = Some(CachedReading {
            reading,
            fetched: Instant::now(),
        });
        Ok(reading)
    }

    /// Drop the cached value so the next read fetches
    pub async fn invalidate(&self) {
        *self.slot.lock().await = None;
    }
}

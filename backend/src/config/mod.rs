//! Configuration management for the Macro Tracker backend
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config files (config/development.toml or config/production.toml)
//! 3. Environment variables (prefix: MT__)

use anyhow::Result;
use macro_tracker_shared::DayCalendar;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Largest page size the food search accepts
pub const MAX_SEARCH_PAGE_SIZE: u32 = 100;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub food_lookup: FoodLookupConfig,
    #[serde(default)]
    pub steps: StepsConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Open Food Facts client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodLookupConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub search_page_size: u32,
}

impl Default for FoodLookupConfig {
    fn default() -> Self {
        Self {
            base_url: "https://world.openfoodfacts.org".to_string(),
            timeout_secs: 10,
            user_agent: format!("MacroTracker/{}", env!("CARGO_PKG_VERSION")),
            search_page_size: 20,
        }
    }
}

impl FoodLookupConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Step count configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepsConfig {
    /// How long a fetched step count is served from cache
    pub freshness_secs: u64,
    pub daily_goal: u32,
}

impl Default for StepsConfig {
    fn default() -> Self {
        Self {
            freshness_secs: 60,
            daily_goal: 10_000,
        }
    }
}

impl StepsConfig {
    pub fn freshness(&self) -> Duration {
        Duration::from_secs(self.freshness_secs)
    }
}

/// Day boundary configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Fixed UTC offset for day boundaries; local time when unset
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

impl CalendarConfig {
    /// Resolve to a calendar, falling back to local time for offsets out of range
    pub fn day_calendar(&self) -> DayCalendar {
        self.utc_offset_minutes
            .and_then(DayCalendar::fixed_offset_minutes)
            .unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            food_lookup: FoodLookupConfig::default(),
            steps: StepsConfig::default(),
            calendar: CalendarConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. Config file based on RUST_ENV (development.toml or production.toml)
    /// 3. Environment variables with MT__ prefix
    pub fn load() -> Result<Self> {
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let config_file = format!("config/{}.toml", env);

        let config = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&AppConfig::default())?)
            // Load from environment-specific config file
            .add_source(config::File::with_name(&config_file).required(false))
            // Override with environment variables (MT__ prefix)
            // e.g., MT__STEPS__DAILY_GOAL=8000 sets steps.daily_goal
            .add_source(config::Environment::with_prefix("MT").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Check if running in production mode
    pub fn is_production() -> bool {
        env::var("RUST_ENV")
            .map(|v| v == "production")
            .unwrap_or(false)
    }

    /// Page size for food searches, clamped to 1..=100
    pub fn search_limit(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.food_lookup.search_page_size)
            .clamp(1, MAX_SEARCH_PAGE_SIZE)
    }
}

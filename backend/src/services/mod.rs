//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories, the shared engine and external systems.

pub mod food_log;
pub mod food_lookup;
pub mod profile;
pub mod progress;
pub mod steps;

pub use food_log::FoodLogService;
pub use food_lookup::{FoodLookup, OpenFoodFactsClient};
pub use profile::ProfileService;
pub use progress::ProgressService;
pub use steps::{StepCountCache, StepCountSource, StepReading, StoreStepSource};

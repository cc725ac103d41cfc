//! Error types for the Macro Tracker engine

use crate::validation::ValidationError;
use thiserror::Error;

/// Errors surfaced by the nutrition engine and its collaborators
///
/// None of these are fatal: a validation failure means the entry or profile
/// is not created, and a lookup failure means the caller falls back to
/// manual entry.
#[derive(Error, Debug)]
pub enum NutritionError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("External service error: {0}")]
    External(String),
}

impl NutritionError {
    /// True for the recoverable "nothing matched" case of a lookup
    pub fn is_not_found(&self) -> bool {
        matches!(self, NutritionError::NotFound(_))
    }
}

pub type NutritionResult<T> = Result<T, NutritionError>;

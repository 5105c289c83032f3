//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! invalid configuration, rooms without eligible surfaces, exhausted sampling budgets
//! and unknown spawned entities.
use thiserror::Error;

use crate::placement::SpawnId;
use crate::room::labels::SurfaceType;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("room has no surface samples for {surface:?}")]
    NoSurfaceSamples { surface: SurfaceType },

    #[error("no valid placement found after {max_iterations} iterations")]
    IterationBudgetExhausted { max_iterations: u32 },

    #[error(
        "farthest-point search accepted {accepted} of {search_budget} candidates before \
         {max_iterations} iterations ran out"
    )]
    SearchBudgetUnfilled {
        max_iterations: u32,
        search_budget: u32,
        accepted: u32,
    },

    #[error("unknown spawned entity {0:?}")]
    UnknownEntity(SpawnId),

    #[cfg(feature = "ron")]
    #[error("ron error: {0}")]
    Ron(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Returns true when the failure came from running out of sampling budget.
    ///
    /// Budget failures are transient from the caller's point of view: the same request
    /// may succeed on a later attempt. Configuration errors never will.
    pub fn is_budget_exhausted(&self) -> bool {
        matches!(
            self,
            Error::IterationBudgetExhausted { .. } | Error::SearchBudgetUnfilled { .. }
        )
    }
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}

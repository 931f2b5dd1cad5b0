use crate::cache::CacheError;
use crate::types::{Category, TeamId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Historical dataset unavailable: {0}")]
    DatasetUnavailable(String),

    #[error("No observations for category {category}")]
    EmptyPopulation { category: Category },

    #[error("Unknown team: {0}")]
    UnknownTeam(TeamId),

    #[error("Invalid roster for {team}: {reason}")]
    InvalidRoster { team: TeamId, reason: String },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Worker pool error: {0}")]
    WorkerPool(String),

    #[error("Export IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Export CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Parameter cache error: {0}")]
    Cache(#[from] CacheError),
}

impl SimError {
    /// Whether the engine can still be used after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SimError::DatasetUnavailable(_)
                | SimError::EmptyPopulation { .. }
                | SimError::InvalidRoster { .. }
                | SimError::InvalidConfig(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SimError>;

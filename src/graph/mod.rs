//! In-memory exploration graph: cards, their interactions and the edges
//! formed by outcome destinations.

pub mod names;
pub mod state_graph;
pub mod types;

use thiserror::Error;

pub use state_graph::{DanglingDestination, ExplorationDict, StateGraph};
pub use types::*;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("A card named '{0}' already exists")]
    DuplicateStateName(String),

    #[error("Invalid card name '{name}': {reason}")]
    InvalidStateName { name: String, reason: String },

    #[error("Cannot delete the initial card '{0}'")]
    CannotDeleteInitialState(String),

    #[error("Card not found: {0}")]
    StateNotFound(String),

    #[error("Failed to parse exploration: {0}")]
    Parse(String),
}

impl GraphError {
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        GraphError::InvalidStateName {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

pub type GraphResult<T> = Result<T, GraphError>;

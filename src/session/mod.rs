//! Editing session over one exploration: owns the graph and records every
//! author edit as an ordered change list.

pub mod change_list;
pub mod session;

use thiserror::Error;

use crate::graph::GraphError;

pub use change_list::{ChangeList, ExplorationChange, ExplorationProperty, StateProperty};
pub use session::{diff_state_property, ExplorationEditingSession, PropertyEdit};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    #[error("Invalid value for property '{property}': {reason}")]
    InvalidPropertyValue { property: String, reason: String },

    #[error("Card not found: {0}")]
    StateNotFound(String),
}

impl SessionError {
    pub fn invalid_value(property: impl ToString, reason: impl ToString) -> Self {
        SessionError::InvalidPropertyValue {
            property: property.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type SessionResult<T> = Result<T, SessionError>;

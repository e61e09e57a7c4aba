//! Graph reachability and consistency warnings for the exploration editor.

pub mod analyzer;
pub mod params;
pub mod reachability;
pub mod top_answers;
pub mod validators;

use serde::{Deserialize, Serialize};

pub use analyzer::ExplorationWarnings;
pub use top_answers::{AnswerStats, StateTopAnswersStats};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WarningType {
    /// Blocks publishing.
    Critical,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    #[serde(rename = "type")]
    pub warning_type: WarningType,
    pub message: String,
}

impl Warning {
    pub fn critical(message: impl Into<String>) -> Self {
        Self {
            warning_type: WarningType::Critical,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            warning_type: WarningType::Error,
            message: message.into(),
        }
    }
}

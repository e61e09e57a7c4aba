use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path};

use crate::{graph::names::DEFAULT_MAX_STATE_NAME_LENGTH, Error, InternalResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub classification: ClassificationConfig,

    #[serde(default)]
    pub warnings: WarningsConfig,

    #[serde(default)]
    pub graph: GraphConfig,
}

/// Feature flags of the answer classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationConfig {
    #[serde(default)]
    pub enable_ml_classifiers: bool,

    #[serde(default = "default_true")]
    pub enable_training_data_classification: bool,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            enable_ml_classifiers: false,
            enable_training_data_classification: default_true(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarningsConfig {
    /// Question editors also accept a solution labelled correct that keeps
    /// the learner on the same card.
    #[serde(default)]
    pub question_mode: bool,

    #[serde(default = "default_unresolved_answer_frequency_threshold")]
    pub unresolved_answer_frequency_threshold: u64,

    #[serde(default = "default_top_answers_limit")]
    pub top_answers_limit: usize,

    #[serde(default)]
    pub report_dangling_destinations: bool,
}

impl Default for WarningsConfig {
    fn default() -> Self {
        Self {
            question_mode: false,
            unresolved_answer_frequency_threshold: default_unresolved_answer_frequency_threshold(),
            top_answers_limit: default_top_answers_limit(),
            report_dangling_destinations: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphConfig {
    #[serde(default = "default_max_state_name_length")]
    pub max_state_name_length: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_state_name_length: default_max_state_name_length(),
        }
    }
}

impl EngineConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> InternalResult<Self> {
        from_file(path)
    }
}

pub fn from_file<T: for<'de> Deserialize<'de>, P: AsRef<Path>>(path: P) -> InternalResult<T> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        Error::Internal(format!("Failed to open {}: {}", path.display(), e))
    })?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader).map_err(|e| {
        Error::Internal(format!("Failed to parse {}: {}", path.display(), e))
    })?;
    Ok(config)
}

pub fn from_str<T: for<'de> Deserialize<'de>>(s: &str) -> InternalResult<T> {
    let config = serde_json::from_str(s)
        .map_err(|e| Error::Internal(format!("Failed to parse config: {}", e)))?;
    Ok(config)
}

fn default_true() -> bool {
    true
}

fn default_unresolved_answer_frequency_threshold() -> u64 {
    5
}

fn default_top_answers_limit() -> usize {
    10
}

fn default_max_state_name_length() -> usize {
    DEFAULT_MAX_STATE_NAME_LENGTH
}

//! Answer classification and solution verification.

pub mod engine;
pub mod prediction;
pub mod result;
pub mod solution;

use thiserror::Error;

use crate::rules::RuleError;

pub use engine::AnswerClassifier;
pub use prediction::{
    ClassifierData, PredictionAlgorithmRegistry, PredictionService, StateClassifierMapping,
};
pub use result::{ClassificationCategory, ClassificationResult};
pub use solution::SolutionVerifier;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassificationError {
    #[error("No interaction rules were available to classify the answer for '{interaction_id}'")]
    MissingRulesProvider { interaction_id: String },

    #[error("Something went wrong with classification of an answer in '{state_name}': no answer group matched and there is no default outcome")]
    NoClassificationPossible { state_name: String },

    #[error("Rule evaluation failed: {0}")]
    Rule(#[from] RuleError),
}

pub type ClassifierResult<T> = Result<T, ClassificationError>;

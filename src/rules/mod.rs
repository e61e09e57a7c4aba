//! Rule evaluation: the seam between the classifier and the
//! interaction-specific rule implementations.

pub mod adapter;
pub mod builtin;
pub mod evaluator;
pub mod registry;

use thiserror::Error;

pub use adapter::RuleAdapter;
pub use evaluator::{PredicateRules, RuleEvaluator};
pub use registry::{InteractionRegistry, InteractionSpec};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    #[error("No rules provider supplied for interaction '{interaction_id}'")]
    MissingRulesProvider { interaction_id: String },

    #[error("Unknown rule type '{rule_type}' for interaction '{interaction_id}'")]
    UnknownRuleType {
        interaction_id: String,
        rule_type: String,
    },

    #[error("Rule '{rule_type}' is missing input '{input}'")]
    MissingRuleInput { rule_type: String, input: String },

    #[error("Rule '{rule_type}' has an invalid input '{input}': {reason}")]
    InvalidRuleInput {
        rule_type: String,
        input: String,
        reason: String,
    },

    #[error("Answer cannot be checked by rule '{rule_type}': {reason}")]
    InvalidAnswer { rule_type: String, reason: String },
}

impl RuleError {
    pub fn unknown_rule(interaction_id: impl Into<String>, rule_type: impl Into<String>) -> Self {
        RuleError::UnknownRuleType {
            interaction_id: interaction_id.into(),
            rule_type: rule_type.into(),
        }
    }
}

pub type RuleResult<T> = Result<T, RuleError>;

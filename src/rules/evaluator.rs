use std::{collections::HashMap, fmt, sync::Arc};

use crate::graph::{AnswerValue, RuleInputs};

use super::{RuleError, RuleResult};

/// Decides whether an answer satisfies one rule of an interaction.
///
/// Implementations are stateless per call: the classifier may evaluate the
/// same rule any number of times and expects the same verdict.
pub trait RuleEvaluator: Send + Sync {
    fn evaluate(&self, rule_type: &str, answer: &AnswerValue, inputs: &RuleInputs)
        -> RuleResult<bool>;
}

pub type RulePredicate = dyn Fn(&AnswerValue, &RuleInputs) -> RuleResult<bool> + Send + Sync;

/// Rule-type name -> predicate table, for rule sets that come from outside
/// the built-in interaction families.
#[derive(Clone, Default)]
pub struct PredicateRules {
    interaction_id: String,
    predicates: HashMap<String, Arc<RulePredicate>>,
}

impl fmt::Debug for PredicateRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.predicates.keys().collect();
        names.sort();
        f.debug_struct("PredicateRules")
            .field("interaction_id", &self.interaction_id)
            .field("rules", &names)
            .finish()
    }
}

impl PredicateRules {
    pub fn new(interaction_id: impl Into<String>) -> Self {
        Self {
            interaction_id: interaction_id.into(),
            predicates: HashMap::new(),
        }
    }

    pub fn with_rule<F>(mut self, rule_type: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&AnswerValue, &RuleInputs) -> RuleResult<bool> + Send + Sync + 'static,
    {
        self.predicates.insert(rule_type.into(), Arc::new(predicate));
        self
    }
}

impl RuleEvaluator for PredicateRules {
    fn evaluate(
        &self,
        rule_type: &str,
        answer: &AnswerValue,
        inputs: &RuleInputs,
    ) -> RuleResult<bool> {
        let predicate = self
            .predicates
            .get(rule_type)
            .ok_or_else(|| RuleError::unknown_rule(&self.interaction_id, rule_type))?;
        predicate(answer, inputs)
    }
}

/// Fetches a required rule input.
pub fn input<'a>(inputs: &'a RuleInputs, rule_type: &str, name: &str) -> RuleResult<&'a AnswerValue> {
    inputs.get(name).ok_or_else(|| RuleError::MissingRuleInput {
        rule_type: rule_type.to_string(),
        input: name.to_string(),
    })
}

pub fn number_input(inputs: &RuleInputs, rule_type: &str, name: &str) -> RuleResult<f64> {
    let value = input(inputs, rule_type, name)?;
    value.as_f64().ok_or_else(|| RuleError::InvalidRuleInput {
        rule_type: rule_type.to_string(),
        input: name.to_string(),
        reason: format!("expected a number, found {}", value),
    })
}

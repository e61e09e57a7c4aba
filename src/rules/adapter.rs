use crate::graph::{AnswerValue, RuleInputs, RuleSpec};

use super::{evaluator::RuleEvaluator, RuleError, RuleResult};

/// Binds an interaction to the rules provider supplied for it, if any.
///
/// Having no provider is not an error until a rule actually has to be
/// evaluated.
#[derive(Clone, Copy)]
pub struct RuleAdapter<'a> {
    interaction_id: &'a str,
    rules: Option<&'a dyn RuleEvaluator>,
}

impl<'a> RuleAdapter<'a> {
    pub fn new(interaction_id: &'a str, rules: Option<&'a dyn RuleEvaluator>) -> Self {
        Self {
            interaction_id,
            rules,
        }
    }

    pub fn has_provider(&self) -> bool {
        self.rules.is_some()
    }

    pub fn provider(&self) -> RuleResult<&'a dyn RuleEvaluator> {
        self.rules.ok_or_else(|| RuleError::MissingRulesProvider {
            interaction_id: self.interaction_id.to_string(),
        })
    }

    pub fn evaluate(
        &self,
        rule_type: &str,
        answer: &AnswerValue,
        inputs: &RuleInputs,
    ) -> RuleResult<bool> {
        self.provider()?.evaluate(rule_type, answer, inputs)
    }

    pub fn matches(&self, rule_spec: &RuleSpec, answer: &AnswerValue) -> RuleResult<bool> {
        self.evaluate(&rule_spec.rule_type, answer, &rule_spec.inputs)
    }
}

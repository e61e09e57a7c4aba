use tracing::{debug, instrument};

use crate::{
    config::ClassificationConfig,
    graph::{AnswerValue, Interaction},
    rules::{InteractionRegistry, RuleAdapter, RuleEvaluator},
};

use super::{
    prediction::{PredictionAlgorithmRegistry, StateClassifierMapping},
    ClassificationCategory, ClassificationError, ClassificationResult, ClassifierResult,
};

/// Maps learner answers to outcomes.
///
/// Strategies are tried in a fixed order and the first hit wins:
///
/// 1. explicit rules, groups and rules in declaration order
/// 2. the statistical classifier of the card (trainable interactions, ML flag on)
/// 3. literal training data (trainable interactions, training data flag on)
/// 4. the default outcome
///
/// Classification never mutates the interaction, so calling it twice with
/// the same inputs yields equal results.
#[derive(Debug, Clone)]
pub struct AnswerClassifier {
    config: ClassificationConfig,
    interactions: InteractionRegistry,
    state_classifiers: StateClassifierMapping,
    algorithms: PredictionAlgorithmRegistry,
}

impl Default for AnswerClassifier {
    fn default() -> Self {
        Self::new(ClassificationConfig::default(), InteractionRegistry::builtin())
    }
}

impl AnswerClassifier {
    pub fn new(config: ClassificationConfig, interactions: InteractionRegistry) -> Self {
        Self {
            config,
            interactions,
            state_classifiers: StateClassifierMapping::new(),
            algorithms: PredictionAlgorithmRegistry::new(),
        }
    }

    pub fn with_prediction(
        mut self,
        state_classifiers: StateClassifierMapping,
        algorithms: PredictionAlgorithmRegistry,
    ) -> Self {
        self.state_classifiers = state_classifiers;
        self.algorithms = algorithms;
        self
    }

    pub fn config(&self) -> &ClassificationConfig {
        &self.config
    }

    pub fn interactions(&self) -> &InteractionRegistry {
        &self.interactions
    }

    /// Classifies `answer` with an explicitly supplied rules provider.
    #[instrument(level = "debug", skip(self, interaction, answer, rules))]
    pub fn classify(
        &self,
        state_name: &str,
        interaction: &Interaction,
        answer: &AnswerValue,
        rules: Option<&dyn RuleEvaluator>,
    ) -> ClassifierResult<ClassificationResult> {
        let interaction_id = interaction.interaction_id().unwrap_or_default();
        let adapter = RuleAdapter::new(interaction_id, rules);
        let needs_rules = interaction
            .answer_groups
            .iter()
            .any(|group| !group.rule_specs.is_empty());
        if needs_rules && !adapter.has_provider() {
            return Err(ClassificationError::MissingRulesProvider {
                interaction_id: interaction_id.to_string(),
            });
        }

        for (group_index, group) in interaction.answer_groups.iter().enumerate() {
            for (rule_index, rule_spec) in group.rule_specs.iter().enumerate() {
                if adapter.matches(rule_spec, answer)? {
                    debug!(group_index, rule_index, "explicit rule matched");
                    return Ok(ClassificationResult::new(
                        group.outcome.clone(),
                        group_index,
                        Some(rule_index),
                        ClassificationCategory::Explicit,
                    ));
                }
            }
        }

        let trainable = self.interactions.is_trainable(interaction_id);
        if trainable && self.config.enable_ml_classifiers {
            if let Some(result) = self.classify_statistically(state_name, interaction, answer) {
                return Ok(result);
            }
        }

        if trainable && self.config.enable_training_data_classification {
            let matched = interaction
                .answer_groups
                .iter()
                .position(|group| group.training_data.contains(answer));
            if let Some(group_index) = matched {
                debug!(group_index, "training data matched");
                return Ok(ClassificationResult::new(
                    interaction.answer_groups[group_index].outcome.clone(),
                    group_index,
                    None,
                    ClassificationCategory::TrainingDataMatch,
                ));
            }
        }

        if let Some(default_outcome) = &interaction.default_outcome {
            debug!("falling back to default outcome");
            return Ok(ClassificationResult::new(
                default_outcome.clone(),
                interaction.answer_groups.len(),
                Some(0),
                ClassificationCategory::DefaultOutcome,
            ));
        }

        Err(ClassificationError::NoClassificationPossible {
            state_name: state_name.to_string(),
        })
    }

    /// Classifies `answer` with the rules registered for the interaction type.
    pub fn classify_with_registry_rules(
        &self,
        state_name: &str,
        interaction: &Interaction,
        answer: &AnswerValue,
    ) -> ClassifierResult<ClassificationResult> {
        let rules = interaction
            .interaction_id()
            .and_then(|id| self.interactions.rules_for(id));
        self.classify(state_name, interaction, answer, rules)
    }

    fn classify_statistically(
        &self,
        state_name: &str,
        interaction: &Interaction,
        answer: &AnswerValue,
    ) -> Option<ClassificationResult> {
        let Some(data) = self.state_classifiers.get(state_name) else {
            debug!(state = state_name, "no classifier model for state");
            return None;
        };
        let group_index = self.algorithms.predict(data, answer)?;
        let Some(group) = interaction.answer_groups.get(group_index) else {
            debug!(group_index, "predicted answer group out of range, ignoring");
            return None;
        };
        debug!(group_index, algorithm = %data.algorithm_id, "statistical classifier matched");
        Some(ClassificationResult::new(
            group.outcome.clone(),
            group_index,
            None,
            ClassificationCategory::StatisticalClassifier,
        ))
    }
}

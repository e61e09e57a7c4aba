use crate::{
    graph::{AnswerValue, Interaction},
    rules::RuleEvaluator,
};

use super::{AnswerClassifier, ClassifierResult};

/// Checks that an author's solution actually gets the learner somewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolutionVerifier {
    /// In question mode a solution that is labelled correct passes even when
    /// it loops back to the same card.
    pub question_mode: bool,
}

impl SolutionVerifier {
    pub fn new(question_mode: bool) -> Self {
        Self { question_mode }
    }

    pub fn verify(
        &self,
        classifier: &AnswerClassifier,
        state_name: &str,
        interaction: &Interaction,
        correct_answer: &AnswerValue,
        rules: Option<&dyn RuleEvaluator>,
    ) -> ClassifierResult<bool> {
        let result = classifier.classify(state_name, interaction, correct_answer, rules)?;
        let advances = result.outcome.destination(state_name) != state_name;
        Ok(advances || (self.question_mode && result.outcome.labelled_as_correct))
    }

    /// Like [`verify`](Self::verify), using the rules registered for the
    /// interaction type.
    pub fn verify_with_registry_rules(
        &self,
        classifier: &AnswerClassifier,
        state_name: &str,
        interaction: &Interaction,
        correct_answer: &AnswerValue,
    ) -> ClassifierResult<bool> {
        let rules = interaction
            .interaction_id()
            .and_then(|id| classifier.interactions().rules_for(id));
        self.verify(classifier, state_name, interaction, correct_answer, rules)
    }
}

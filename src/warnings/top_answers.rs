use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    classifier::AnswerClassifier,
    graph::{AnswerValue, StateGraph},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerStats {
    pub answer: AnswerValue,
    pub frequency: u64,
    #[serde(default, alias = "is_addressed")]
    pub is_addressed: bool,
}

/// Most frequent learner answers per card, as collected by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateTopAnswersStats {
    #[serde(default)]
    pub answers: BTreeMap<String, Vec<AnswerStats>>,
    #[serde(default, alias = "interactionIds")]
    pub interaction_ids: BTreeMap<String, String>,
}

impl StateTopAnswersStats {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// True if one of the `limit` most frequent answers of the card is
    /// unaddressed and was given at least `threshold` times.
    pub fn has_unresolved_answers(&self, state_name: &str, limit: usize, threshold: u64) -> bool {
        let Some(answers) = self.answers.get(state_name) else {
            return false;
        };
        let mut top: Vec<&AnswerStats> = answers.iter().collect();
        top.sort_by(|a, b| b.frequency.cmp(&a.frequency));
        top.into_iter()
            .take(limit)
            .any(|stats| !stats.is_addressed && stats.frequency >= threshold)
    }

    /// Recomputes `is_addressed` against the current graph. An answer is
    /// addressed unless it falls through to the default outcome without
    /// having been confirmed as unclassified.
    pub fn refresh_addressed(&mut self, graph: &StateGraph, classifier: &AnswerClassifier) {
        for (state_name, answers) in self.answers.iter_mut() {
            let Some(state) = graph.get_state(state_name) else {
                continue;
            };
            let interaction = &state.interaction;
            for stats in answers.iter_mut() {
                stats.is_addressed = match classifier.classify_with_registry_rules(
                    state_name,
                    interaction,
                    &stats.answer,
                ) {
                    Ok(result) => {
                        !result.is_default()
                            || interaction
                                .confirmed_unclassified_answers
                                .contains(&stats.answer)
                    }
                    Err(e) => {
                        warn!(state = %state_name, error = %e, "could not classify top answer");
                        false
                    }
                };
            }
        }
    }
}

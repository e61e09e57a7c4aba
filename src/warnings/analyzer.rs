use std::collections::BTreeMap;

use tracing::{debug, info, instrument, warn};

use crate::{
    classifier::{AnswerClassifier, ClassificationError, SolutionVerifier},
    config::WarningsConfig,
    graph::{DanglingDestination, ParamChange, State, StateGraph},
};

use super::{
    params::undefined_param_uses,
    reachability::{states_reaching_completion, unreachable_states},
    top_answers::StateTopAnswersStats,
    validators::validate_interaction,
    Warning, WarningType,
};

pub const INCORRECT_SOLUTION: &str = "The current solution does not lead to another card.";
pub const UNREACHABLE: &str = "This card is unreachable.";
pub const NO_PATH_TO_END: &str = "There's no way to complete the exploration starting from this card. To fix this, make sure that the last card in the chain starting from this one has an 'End Exploration' question type.";

/// Exploration-wide health report for the editor.
///
/// [`update_warnings`](Self::update_warnings) recomputes everything from a
/// snapshot of the graph; the accessors only read the last result. The
/// analyzer never fails on bad data: problems become [`Warning`]s.
#[derive(Debug, Clone)]
pub struct ExplorationWarnings {
    config: WarningsConfig,
    classifier: AnswerClassifier,
    top_answers: Option<StateTopAnswersStats>,
    warnings: Vec<Warning>,
    state_warnings: BTreeMap<String, Vec<String>>,
    dangling: Vec<DanglingDestination>,
}

impl Default for ExplorationWarnings {
    fn default() -> Self {
        Self::new(WarningsConfig::default(), AnswerClassifier::default())
    }
}

impl ExplorationWarnings {
    pub fn new(config: WarningsConfig, classifier: AnswerClassifier) -> Self {
        Self {
            config,
            classifier,
            top_answers: None,
            warnings: Vec::new(),
            state_warnings: BTreeMap::new(),
            dangling: Vec::new(),
        }
    }

    /// Supplies learner answer statistics. Without them the unresolved
    /// answer check is skipped.
    pub fn set_top_answers(&mut self, top_answers: Option<StateTopAnswersStats>) {
        self.top_answers = top_answers;
    }

    pub fn get_warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn count_warnings(&self) -> usize {
        self.warnings.len()
    }

    pub fn has_critical_warnings(&self) -> bool {
        self.warnings
            .iter()
            .any(|warning| warning.warning_type == WarningType::Critical)
    }

    pub fn get_all_state_related_warnings(&self) -> &BTreeMap<String, Vec<String>> {
        &self.state_warnings
    }

    pub fn get_dangling_destinations(&self) -> &[DanglingDestination] {
        &self.dangling
    }

    #[instrument(level = "debug", skip(self, graph, param_changes))]
    pub fn update_warnings(
        &mut self,
        graph: &StateGraph,
        init_state_name: &str,
        param_changes: &[ParamChange],
    ) {
        let mut state_warnings: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut add = |name: &str, message: String| {
            state_warnings
                .entry(name.to_string())
                .or_default()
                .push(message);
        };

        for state in graph.states() {
            for message in validate_interaction(&state.name, &state.interaction) {
                add(&state.name, message);
            }
            if self.has_unresolved_answers(&state.name) {
                add(
                    &state.name,
                    format!(
                        "There is an answer among the top {} which has no explicit feedback.",
                        self.config.top_answers_limit
                    ),
                );
            }
            if self.has_incorrect_solution(state) {
                add(&state.name, INCORRECT_SOLUTION.to_string());
            }
        }

        let unreachable = unreachable_states(graph, init_state_name);
        let completes = states_reaching_completion(graph, self.classifier.interactions());
        for name in graph.state_names() {
            if unreachable.contains(&name) {
                add(&name, UNREACHABLE.to_string());
            } else if !completes.contains(&name) {
                add(&name, NO_PATH_TO_END.to_string());
            }
        }

        self.dangling = graph.dangling_destinations();
        if self.config.report_dangling_destinations {
            for dangling in &self.dangling {
                add(
                    &dangling.state_name,
                    format!(
                        "The destination '{}' of an outcome does not match any card.",
                        dangling.dest
                    ),
                );
            }
        }

        let mut warnings: Vec<Warning> = undefined_param_uses(graph, init_state_name, param_changes)
            .into_iter()
            .map(|param_use| Warning::critical(param_use.to_string()))
            .collect();

        if !state_warnings.is_empty() {
            let names: Vec<&str> = state_warnings.keys().map(String::as_str).collect();
            let message = if names.len() == 1 {
                format!("The following card has errors: {}.", names[0])
            } else {
                format!("The following cards have errors: {}.", names.join(", "))
            };
            warnings.push(Warning::error(message));
        }

        for state in graph.states() {
            if let Some(message) = untrained_classifier_message(state) {
                warnings.push(Warning::error(message));
            }
        }

        info!(
            warnings = warnings.len(),
            states_with_errors = state_warnings.len(),
            "updated exploration warnings"
        );
        self.warnings = warnings;
        self.state_warnings = state_warnings;
    }

    fn has_unresolved_answers(&self, state_name: &str) -> bool {
        self.top_answers.as_ref().is_some_and(|top| {
            top.has_unresolved_answers(
                state_name,
                self.config.top_answers_limit,
                self.config.unresolved_answer_frequency_threshold,
            )
        })
    }

    fn has_incorrect_solution(&self, state: &State) -> bool {
        let interaction = &state.interaction;
        let Some(solution) = &interaction.solution else {
            return false;
        };
        if interaction.interaction_id().is_none() {
            return false;
        }
        let verifier = SolutionVerifier::new(self.config.question_mode);
        match verifier.verify_with_registry_rules(
            &self.classifier,
            &state.name,
            interaction,
            &solution.correct_answer,
        ) {
            Ok(valid) => !valid,
            Err(ClassificationError::NoClassificationPossible { .. }) => true,
            Err(e) => {
                warn!(state = %state.name, error = %e, "skipping solution check");
                false
            }
        }
    }
}

/// Groups that have neither rules nor training data can never match.
fn untrained_classifier_message(state: &State) -> Option<String> {
    let indexes: Vec<String> = state
        .interaction
        .answer_groups
        .iter()
        .enumerate()
        .filter(|(_, group)| group.has_empty_classifier())
        .map(|(i, _)| i.to_string())
        .collect();
    debug!(state = %state.name, untrained = indexes.len(), "checked answer group classifiers");
    match indexes.len() {
        0 => None,
        1 => Some(format!(
            "In '{}', the following answer group has a classifier with no training data: {}",
            state.name, indexes[0]
        )),
        _ => Some(format!(
            "In '{}', the following answer groups have classifiers with no training data: {}",
            state.name,
            indexes.join(", ")
        )),
    }
}

use exploration_core::{
    classifier::AnswerClassifier,
    config::{self, EngineConfig},
    graph::{
        AnswerGroup, Interaction, Outcome, ParamChange, RuleSpec, State, StateGraph, SubtitledHtml,
    },
    rules::InteractionRegistry,
    warnings::{ExplorationWarnings, Warning, WarningType},
};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::NO_PATH_TO_END;

/// A TextInput card with one explicit rule per destination and feedback on
/// every outcome, so only graph shape produces warnings.
fn card(name: &str, dests: &[&str]) -> State {
    let mut state = State::new(name);
    state.interaction = Interaction::new("TextInput");
    state.interaction.answer_groups = dests
        .iter()
        .enumerate()
        .map(|(i, dest)| {
            AnswerGroup::new(
                vec![RuleSpec::with_x("Equals", json!(format!("go {}", i)))],
                Outcome::new(*dest, SubtitledHtml::new(format!("feedback_{}", i), "<p>Ok</p>")),
            )
        })
        .collect();
    state
}

fn end_card(name: &str) -> State {
    let mut state = State::new(name);
    state.interaction = Interaction::new("EndExploration");
    state.interaction.default_outcome = None;
    state
}

fn graph(states: Vec<State>) -> StateGraph {
    StateGraph::from_states(states.into_iter().map(|state| (state.name.clone(), state)))
}

fn analyze(graph: &StateGraph, init: &str) -> ExplorationWarnings {
    let mut warnings = ExplorationWarnings::default();
    warnings.update_warnings(graph, init, &[]);
    warnings
}

#[test]
fn test_card_without_inbound_edges_is_unreachable() {
    let graph = graph(vec![card("A", &["B"]), card("B", &["End"]), card("C", &["End"]), end_card("End")]);
    let warnings = analyze(&graph, "A");
    let by_state = warnings.get_all_state_related_warnings();

    assert_eq!(by_state["C"], vec!["This card is unreachable."]);
    assert!(!by_state.contains_key("A"));
    assert!(!by_state.contains_key("B"));
    assert_eq!(
        warnings.get_warnings(),
        &[Warning::error("The following card has errors: C.")]
    );
}

#[test]
fn test_self_looping_initial_card_cannot_complete() {
    let graph = graph(vec![card("A", &["A"]), card("B", &["A"])]);
    let warnings = analyze(&graph, "A");
    let by_state = warnings.get_all_state_related_warnings();

    assert!(by_state["A"].contains(&NO_PATH_TO_END.to_string()));
    assert_eq!(by_state["B"], vec!["This card is unreachable."]);
    assert!(!warnings.has_critical_warnings());
}

#[test]
fn test_untrained_groups_are_listed_together() {
    let mut state = card("A", &["End"]);
    state.interaction.answer_groups.push(AnswerGroup::new(
        vec![],
        Outcome::new("End", SubtitledHtml::new("feedback_x", "<p>x</p>")),
    ));
    state.interaction.answer_groups.push(AnswerGroup::new(
        vec![],
        Outcome::new("End", SubtitledHtml::new("feedback_y", "<p>y</p>")),
    ));
    let graph = graph(vec![state, end_card("End")]);
    let warnings = analyze(&graph, "A");

    let untrained: Vec<&Warning> = warnings
        .get_warnings()
        .iter()
        .filter(|warning| warning.message.contains("training data"))
        .collect();
    assert_eq!(untrained.len(), 1);
    assert_eq!(untrained[0].warning_type, WarningType::Error);
    assert_eq!(
        untrained[0].message,
        "In 'A', the following answer groups have classifiers with no training data: 1, 2"
    );

    let trained = AnswerGroup::new(
        vec![],
        Outcome::new("End", SubtitledHtml::new("feedback_z", "<p>z</p>")),
    )
    .with_training_data(vec![json!("hello")]);
    assert!(!trained.has_empty_classifier());
}

#[test]
fn test_param_defined_first_suppresses_warning() {
    let graph = graph(vec![end_card("A")]);
    let uses_before_set = vec![
        ParamChange::copier("greeting", "{{ParamChange2}}", true),
        ParamChange::copier("ParamChange2", "hi", false),
    ];
    let mut warnings = ExplorationWarnings::default();
    warnings.update_warnings(&graph, "A", &uses_before_set);
    assert_eq!(warnings.get_warnings().len(), 1);
    assert!(warnings.get_warnings()[0].message.contains("\"ParamChange2\""));
    assert!(warnings.has_critical_warnings());

    let set_first: Vec<ParamChange> = uses_before_set.into_iter().rev().collect();
    warnings.update_warnings(&graph, "A", &set_first);
    assert!(warnings.get_warnings().is_empty());
}

#[test]
fn test_params_set_by_earlier_cards_are_defined() {
    let mut first = card("A", &["B"]);
    first.param_changes = vec![ParamChange::copier("name", "Ana", false)];
    let mut second = card("B", &["End"]);
    second.content = SubtitledHtml::new("content", "<p>Hi {{name}}, {{mood}}?</p>");
    let graph = graph(vec![first, second, end_card("End")]);
    let warnings = analyze(&graph, "A");

    assert_eq!(
        warnings.get_warnings(),
        &[Warning::critical(
            "Please ensure the value of parameter \"mood\" is set before using it in \"B\"."
        )]
    );
}

#[test]
fn test_deeply_nested_content_block_is_skipped() {
    let nested = format!("{}ghost{}", "(".repeat(3000), ")".repeat(3000));
    let mut second = card("B", &["End"]);
    second.content = SubtitledHtml::new(
        "content",
        format!("<p>{{{{{}}}}} {{{{ -(-(mood)) }}}}</p>", nested),
    );
    let graph = graph(vec![card("A", &["B"]), second, end_card("End")]);
    let warnings = analyze(&graph, "A");

    assert_eq!(
        warnings.get_warnings(),
        &[Warning::critical(
            "Please ensure the value of parameter \"mood\" is set before using it in \"B\"."
        )]
    );
}

#[test]
fn test_dangling_destinations_are_opt_in() {
    let graph = graph(vec![card("A", &["End", "Gone"]), end_card("End")]);
    assert_eq!(analyze(&graph, "A").get_warnings(), &[] as &[Warning]);

    let config: EngineConfig =
        config::from_str(r#"{"warnings": {"report_dangling_destinations": true}}"#).unwrap();
    let mut warnings = ExplorationWarnings::new(
        config.warnings,
        AnswerClassifier::new(config.classification, InteractionRegistry::builtin()),
    );
    warnings.update_warnings(&graph, "A", &[]);
    assert_eq!(
        warnings.get_all_state_related_warnings()["A"],
        vec!["The destination 'Gone' of an outcome does not match any card."]
    );
}

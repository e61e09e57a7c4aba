use std::collections::BTreeMap;

use exploration_core::{
    config,
    graph::{ExplorationDict, StateGraph},
    warnings::{ExplorationWarnings, StateTopAnswersStats, Warning},
};
use pretty_assertions::assert_eq;
use serde_json::json;

use super::fixture_path;
use crate::common::{analyze, broken_card, graph_of, with_solution, NO_PATH_TO_END};

const PARAM_CHANGE2: &str = "Please ensure the value of parameter \"ParamChange2\" is set before it is referred to in the initial list of parameter changes.";
const HTML_VALUE_IN_HOLA: &str =
    "Please ensure the value of parameter \"HtmlValue\" is set before using it in \"Hola\".";
const PLACEHOLDER: &str = "Placeholder text must be a string.";
const ROWS: &str = "Number of rows must be integral.";
const SOLUTION: &str = "The current solution does not lead to another card.";

fn expected_warnings(cards_message: &str, untrained: &[&str]) -> Vec<Warning> {
    let mut warnings = vec![
        Warning::critical(PARAM_CHANGE2),
        Warning::critical(HTML_VALUE_IN_HOLA),
        Warning::error(cards_message),
    ];
    warnings.extend(untrained.iter().map(|message| Warning::error(*message)));
    warnings
}

fn state_warnings(entries: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
    entries
        .iter()
        .map(|(name, messages)| {
            (
                name.to_string(),
                messages.iter().map(|m| m.to_string()).collect(),
            )
        })
        .collect()
}

const HOLA_UNTRAINED: &str =
    "In 'Hola', the following answer group has a classifier with no training data: 0";

#[test]
fn test_text_input_warnings() {
    let graph = graph_of(json!({"Hola": broken_card(Some("TextInput"), "Hola")}));
    let warnings = analyze(&graph);

    assert_eq!(
        warnings.get_warnings(),
        expected_warnings("The following card has errors: Hola.", &[HOLA_UNTRAINED]).as_slice()
    );
    assert!(warnings.has_critical_warnings());
    assert_eq!(warnings.count_warnings(), 4);
    assert_eq!(
        warnings.get_all_state_related_warnings(),
        &state_warnings(&[("Hola", &[PLACEHOLDER, ROWS, NO_PATH_TO_END])])
    );
}

#[test]
fn test_continue_warnings() {
    let mut card = broken_card(Some("Continue"), "Hola");
    let group = card["interaction"]["answerGroups"][0].clone();
    card["interaction"]["answerGroups"] = json!([group.clone(), group]);
    card["interaction"]["customizationArgs"]["buttonText"] = json!({"value": ""});
    // Backend payloads use snake_case for some keys.
    let card_fields = card.as_object_mut().unwrap();
    card_fields.remove("recordedVoiceovers");
    card_fields.insert(
        "recorded_voiceovers".to_string(),
        json!({"voiceovers_mapping": {}}),
    );
    let graph = graph_of(json!({"Hola": card}));
    let warnings = analyze(&graph);

    assert_eq!(
        warnings.get_warnings(),
        expected_warnings(
            "The following card has errors: Hola.",
            &["In 'Hola', the following answer groups have classifiers with no training data: 0, 1"]
        )
        .as_slice()
    );
    assert_eq!(warnings.count_warnings(), 4);
    assert_eq!(
        warnings.get_all_state_related_warnings(),
        &state_warnings(&[(
            "Hola",
            &[
                "The button text should not be empty.",
                "Only the default outcome is necessary for a continue interaction.",
                NO_PATH_TO_END,
            ]
        )])
    );
}

#[test]
fn test_missing_interaction_warnings() {
    let graph = graph_of(json!({"Hola": broken_card(None, "Hola")}));
    let warnings = analyze(&graph);

    assert_eq!(
        warnings.get_warnings(),
        expected_warnings("The following card has errors: Hola.", &[HOLA_UNTRAINED]).as_slice()
    );
    assert_eq!(
        warnings.get_all_state_related_warnings(),
        &state_warnings(&[(
            "Hola",
            &["Please add an interaction to this card.", NO_PATH_TO_END]
        )])
    );
}

#[test]
fn test_solution_that_stays_on_card() {
    let graph = graph_of(json!({"Hola": with_solution(broken_card(Some("TextInput"), "Hola"))}));
    let warnings = analyze(&graph);

    assert_eq!(warnings.count_warnings(), 4);
    assert_eq!(
        warnings.get_all_state_related_warnings(),
        &state_warnings(&[("Hola", &[PLACEHOLDER, ROWS, SOLUTION, NO_PATH_TO_END])])
    );
}

#[test]
fn test_unresolved_top_answer() {
    let graph = graph_of(json!({"Hola": with_solution(broken_card(Some("TextInput"), "Hola"))}));
    let top_answers = StateTopAnswersStats::from_json(
        r#"{
            "answers": {"Hola": [{"answer": "hola", "frequency": 7, "isAddressed": false}]},
            "interaction_ids": {"Hola": "TextInput"}
        }"#,
    )
    .unwrap();
    let mut warnings = ExplorationWarnings::default();
    warnings.set_top_answers(Some(top_answers));
    warnings.update_warnings(&graph, "Hola", &crate::common::jinja_param_changes());

    assert_eq!(
        warnings.get_warnings(),
        expected_warnings("The following card has errors: Hola.", &[HOLA_UNTRAINED]).as_slice()
    );
    assert_eq!(
        warnings.get_all_state_related_warnings(),
        &state_warnings(&[(
            "Hola",
            &[
                PLACEHOLDER,
                ROWS,
                "There is an answer among the top 10 which has no explicit feedback.",
                SOLUTION,
                NO_PATH_TO_END,
            ]
        )])
    );
}

#[test]
fn test_default_outcome_to_missing_card() {
    let mut card = with_solution(broken_card(Some("TextInput"), "State"));
    card["recordedVoiceovers"] = json!({"voiceovers_mapping": {}});
    let graph = graph_of(json!({"Hola": card}));
    let warnings = analyze(&graph);

    assert_eq!(warnings.count_warnings(), 4);
    assert_eq!(
        warnings.get_all_state_related_warnings(),
        &state_warnings(&[("Hola", &[PLACEHOLDER, ROWS, NO_PATH_TO_END])])
    );
    assert_eq!(warnings.get_dangling_destinations().len(), 1);
    assert_eq!(warnings.get_dangling_destinations()[0].dest, "State");
}

#[test]
fn test_two_cards_one_unreachable() {
    let graph = graph_of(json!({
        "Hola": with_solution(broken_card(Some("TextInput"), "Hola")),
        "State": with_solution(broken_card(Some("TextInput"), "State")),
    }));
    let warnings = analyze(&graph);

    assert_eq!(
        warnings.get_warnings(),
        expected_warnings(
            "The following cards have errors: Hola, State.",
            &[
                HOLA_UNTRAINED,
                "In 'State', the following answer group has a classifier with no training data: 0",
            ]
        )
        .as_slice()
    );
    assert_eq!(warnings.count_warnings(), 5);
    // Hola is reachable but loops on itself, so it still gets the dead end
    // message even though another card is unreachable.
    assert_eq!(
        warnings.get_all_state_related_warnings(),
        &state_warnings(&[
            ("Hola", &[PLACEHOLDER, ROWS, SOLUTION, NO_PATH_TO_END]),
            ("State", &[PLACEHOLDER, ROWS, SOLUTION, "This card is unreachable."]),
        ])
    );
}

#[test]
fn test_healthy_exploration_has_no_warnings() {
    let dict: ExplorationDict = config::from_file(fixture_path("complete_exploration.json")).unwrap();
    let param_changes = dict.param_changes.clone();
    let init_state_name = dict.init_state_name.clone().unwrap();
    let graph = StateGraph::from_dict(dict);

    let mut warnings = ExplorationWarnings::default();
    warnings.update_warnings(&graph, &init_state_name, &param_changes);

    assert_eq!(warnings.get_warnings(), &[] as &[Warning]);
    assert!(warnings.get_all_state_related_warnings().is_empty());
    assert!(!warnings.has_critical_warnings());
}

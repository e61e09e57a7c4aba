//! Builders for the explorations shared by the integration tests.

use exploration_core::{
    graph::{ExplorationDict, ParamChange, StateGraph},
    warnings::ExplorationWarnings,
};
use serde_json::{json, Value};

pub const NO_PATH_TO_END: &str = "There's no way to complete the exploration starting from this card. To fix this, make sure that the last card in the chain starting from this one has an 'End Exploration' question type.";

/// Initial parameter changes where an unnamed Copier reads `ParamChange2`
/// before anything sets it.
pub fn jinja_param_changes() -> Vec<ParamChange> {
    serde_json::from_value(json!([
        {
            "customizationArgs": {"parse_with_jinja": false, "value": "5"},
            "generatorId": "Copier",
            "name": "ParamChange1"
        },
        {
            "customizationArgs": {"parse_with_jinja": true, "value": "{{ParamChange2}}"},
            "generatorId": "Copier"
        },
        {
            "customizationArgs": {"parse_with_jinja": true, "value": "5"},
            "generatorId": "RandomSelector",
            "name": "ParamChange3"
        }
    ]))
    .unwrap()
}

/// A card whose content reads `HtmlValue`, with one untrained answer group
/// and badly typed TextInput customization args.
pub fn broken_card(interaction_id: Option<&str>, default_dest: &str) -> Value {
    let mut interaction = json!({
        "answerGroups": [{
            "outcome": {"dest": "", "feedback": {"contentId": "feedback_1", "html": ""}},
            "ruleSpecs": [],
            "trainingData": []
        }],
        "defaultOutcome": {"dest": default_dest, "feedback": {"contentId": "", "html": ""}},
        "customizationArgs": {"rows": {"value": true}, "placeholder": {"value": 1}},
        "hints": []
    });
    if let Some(id) = interaction_id {
        interaction["id"] = json!(id);
    } else {
        interaction["customizationArgs"] = json!({});
    }
    json!({
        "content": {"contentId": "content", "html": "{{HtmlValue}}"},
        "recordedVoiceovers": {"voiceoversMapping": {}},
        "paramChanges": [],
        "interaction": interaction,
        "writtenTranslations": {"translationsMapping": {"content": {}, "defaultOutcome": {}}}
    })
}

pub fn with_solution(mut card: Value) -> Value {
    card["interaction"]["solution"] = json!({
        "correctAnswer": "This is the correct answer",
        "answerIsExclusive": false,
        "explanation": {"html": "Solution explanation"}
    });
    card
}

pub fn graph_of(states: Value) -> StateGraph {
    let dict: ExplorationDict = serde_json::from_value(json!({
        "initStateName": "Hola",
        "states": states
    }))
    .unwrap();
    StateGraph::from_dict(dict)
}

/// Runs a default analyzer over `graph` with the jinja parameter list.
pub fn analyze(graph: &StateGraph) -> ExplorationWarnings {
    let mut warnings = ExplorationWarnings::default();
    warnings.update_warnings(graph, "Hola", &jinja_param_changes());
    warnings
}

use exploration_core::{
    classifier::{AnswerClassifier, ClassificationCategory},
    graph::{ContentIdRegistry, GraphError, StateGraph},
    session::{ExplorationChange, ExplorationEditingSession, SessionError, StateProperty},
    warnings::ExplorationWarnings,
    Error,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::NO_PATH_TO_END;

fn new_session() -> ExplorationEditingSession {
    ExplorationEditingSession::new(StateGraph::new(), vec![])
}

#[test]
fn test_build_exploration_through_session() {
    let mut session = new_session();
    assert_eq!(session.add_state("  Hola   amigo ").unwrap(), "Hola amigo");
    session.add_state("End").unwrap();
    assert_eq!(session.init_state_name(), Some("Hola amigo"));

    session
        .record_edit("End", StateProperty::WidgetId, Value::Null, json!("EndExploration"))
        .unwrap();
    let old = session.state_property("End", StateProperty::DefaultOutcome).unwrap();
    session
        .record_edit("End", StateProperty::DefaultOutcome, old, Value::Null)
        .unwrap();
    let end = session.graph().get_state("End").unwrap();
    assert!(!end.recorded_voiceovers.has_content_id("default_outcome"));
    assert!(!end.written_translations.has_content_id("default_outcome"));

    session
        .record_edit("Hola amigo", StateProperty::WidgetId, Value::Null, json!("TextInput"))
        .unwrap();
    let old = session.state_property("Hola amigo", StateProperty::AnswerGroups).unwrap();
    let groups = json!([{
        "ruleSpecs": [{"ruleType": "Equals", "inputs": {"x": "adios"}}],
        "outcome": {"dest": "End", "feedback": {"contentId": "feedback_1", "html": "<p>Bye</p>"}}
    }]);
    assert!(session
        .record_edit("Hola amigo", StateProperty::AnswerGroups, old, groups)
        .unwrap());
    let hola = session.graph().get_state("Hola amigo").unwrap();
    assert!(hola.recorded_voiceovers.has_content_id("feedback_1"));
    assert!(hola.written_translations.has_content_id("feedback_1"));

    let result = session
        .classify(&AnswerClassifier::default(), "Hola amigo", &json!("Adios"))
        .unwrap();
    assert_eq!(result.category, ClassificationCategory::Explicit);
    assert_eq!(result.outcome.dest.as_deref(), Some("End"));

    let mut warnings = ExplorationWarnings::default();
    session.update_warnings(&mut warnings);
    assert!(warnings.get_warnings().is_empty(), "{:?}", warnings.get_warnings());

    let commands: Vec<Value> = session
        .change_list()
        .changes()
        .iter()
        .map(|change| serde_json::to_value(change).unwrap()["cmd"].clone())
        .collect();
    assert_eq!(
        commands,
        vec![
            json!("add_state"),
            json!("edit_exploration_property"),
            json!("add_state"),
            json!("edit_state_property"),
            json!("edit_state_property"),
            json!("edit_state_property"),
            json!("edit_state_property"),
        ]
    );
}

#[test]
fn test_rename_keeps_graph_consistent() {
    let mut session = new_session();
    session.add_state("Hola").unwrap();
    session.add_state("End").unwrap();
    session
        .record_edit("End", StateProperty::WidgetId, Value::Null, json!("EndExploration"))
        .unwrap();
    let old = session.state_property("Hola", StateProperty::DefaultOutcome).unwrap();
    let mut new = old.clone();
    new["dest"] = json!("End");
    session
        .record_edit("Hola", StateProperty::DefaultOutcome, old, new)
        .unwrap();

    session.rename_state("End", "Fin").unwrap();
    let hola = session.graph().get_state("Hola").unwrap();
    assert_eq!(
        hola.interaction.default_outcome.as_ref().unwrap().dest.as_deref(),
        Some("Fin")
    );
    assert!(session.graph().dangling_destinations().is_empty());

    let mut warnings = ExplorationWarnings::default();
    session.update_warnings(&mut warnings);
    let hola_warnings = warnings.get_all_state_related_warnings().get("Hola");
    assert!(hola_warnings.map_or(true, |messages| !messages.contains(&NO_PATH_TO_END.to_string())));
}

#[test]
fn test_invalid_edits_are_rejected() {
    let mut session = new_session();
    session.add_state("Hola").unwrap();

    assert_eq!(
        session.add_state("Hola"),
        Err(SessionError::Graph(GraphError::DuplicateStateName("Hola".to_string())))
    );
    assert!(matches!(
        session.add_state("a/b"),
        Err(SessionError::Graph(GraphError::InvalidStateName { .. }))
    ));
    assert!(matches!(
        session.record_edit("Hola", StateProperty::Hints, json!([]), json!({"oops": true})),
        Err(SessionError::InvalidPropertyValue { .. })
    ));
    assert_eq!(
        session.delete_state("Hola"),
        Err(SessionError::Graph(GraphError::CannotDeleteInitialState("Hola".to_string())))
    );
    assert_eq!(session.change_list().len(), 2);
    assert!(matches!(
        session.change_list().changes()[0],
        ExplorationChange::AddState { .. }
    ));

    let error: Error = session
        .classify(&AnswerClassifier::default(), "Nope", &json!(1))
        .unwrap_err();
    assert!(matches!(
        error,
        Error::Session(SessionError::StateNotFound(_))
    ));
}

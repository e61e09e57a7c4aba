use std::collections::BTreeSet;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::{
    classifier::{AnswerClassifier, ClassificationResult},
    graph::{
        AnswerGroup, AnswerValue, ContentIdRegistry, ExplorationDict, Hint, Outcome, ParamChange,
        Solution, State, StateGraph,
    },
    warnings::ExplorationWarnings,
    InternalResult,
};

use super::{
    change_list::{ChangeList, ExplorationChange, ExplorationProperty, StateProperty},
    SessionError, SessionResult,
};

/// Content ids to register and to drop after one property edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyEdit {
    pub content_ids_to_add: Vec<String>,
    pub content_ids_to_delete: Vec<String>,
}

impl PropertyEdit {
    pub fn is_empty(&self) -> bool {
        self.content_ids_to_add.is_empty() && self.content_ids_to_delete.is_empty()
    }

    fn apply(&self, state: &mut State) {
        for content_id in &self.content_ids_to_delete {
            state.recorded_voiceovers.delete_content_id(content_id);
            state.written_translations.delete_content_id(content_id);
        }
        for content_id in &self.content_ids_to_add {
            state.recorded_voiceovers.add_content_id(content_id);
            state.written_translations.add_content_id(content_id);
        }
    }
}

fn decode<T: DeserializeOwned>(property: StateProperty, value: &Value) -> SessionResult<T> {
    serde_json::from_value(value.clone()).map_err(|e| SessionError::invalid_value(property, e))
}

fn encode<T: Serialize>(property: StateProperty, value: &T) -> SessionResult<Value> {
    serde_json::to_value(value).map_err(|e| SessionError::invalid_value(property, e))
}

/// Translatable content ids held by one property value.
fn content_ids(property: StateProperty, value: &Value) -> SessionResult<BTreeSet<String>> {
    let ids = match property {
        StateProperty::AnswerGroups => decode::<Vec<AnswerGroup>>(property, value)?
            .into_iter()
            .map(|group| group.outcome.feedback.content_id)
            .collect(),
        StateProperty::DefaultOutcome => decode::<Option<Outcome>>(property, value)?
            .map(|outcome| outcome.feedback.content_id)
            .into_iter()
            .collect(),
        StateProperty::Hints => decode::<Vec<Hint>>(property, value)?
            .into_iter()
            .map(|hint| hint.hint_content.content_id)
            .collect(),
        StateProperty::Solution => decode::<Option<Solution>>(property, value)?
            .map(|solution| solution.explanation.content_id)
            .into_iter()
            .collect(),
        _ => BTreeSet::new(),
    };
    Ok(ids)
}

/// Compares the content ids of two values of the same property.
///
/// Ids only in `old` are deleted, ids only in `new` are added. Properties
/// without translatable content always give an empty edit.
pub fn diff_state_property(
    property: StateProperty,
    old_value: &Value,
    new_value: &Value,
) -> SessionResult<PropertyEdit> {
    if !property.carries_content_ids() {
        return Ok(PropertyEdit::default());
    }
    let old_ids = content_ids(property, old_value)?;
    let new_ids = content_ids(property, new_value)?;
    Ok(PropertyEdit {
        content_ids_to_add: new_ids.difference(&old_ids).cloned().collect(),
        content_ids_to_delete: old_ids.difference(&new_ids).cloned().collect(),
    })
}

/// Current value of `property` on `state`, in backend shape.
fn read_property(state: &State, property: StateProperty) -> SessionResult<Value> {
    let interaction = &state.interaction;
    match property {
        StateProperty::Content => encode(property, &state.content),
        StateProperty::ParamChanges => encode(property, &state.param_changes),
        StateProperty::WidgetId => encode(property, &interaction.id),
        StateProperty::WidgetCustomizationArgs => encode(property, &interaction.customization_args),
        StateProperty::AnswerGroups => encode(property, &interaction.answer_groups),
        StateProperty::ConfirmedUnclassifiedAnswers => {
            encode(property, &interaction.confirmed_unclassified_answers)
        }
        StateProperty::DefaultOutcome => encode(property, &interaction.default_outcome),
        StateProperty::Hints => encode(property, &interaction.hints),
        StateProperty::Solution => encode(property, &interaction.solution),
        StateProperty::SolicitAnswerDetails => encode(property, &state.solicit_answer_details),
        StateProperty::RecordedVoiceovers => encode(property, &state.recorded_voiceovers),
        StateProperty::WrittenTranslations => encode(property, &state.written_translations),
    }
}

fn write_property(state: &mut State, property: StateProperty, value: &Value) -> SessionResult<()> {
    let interaction = &mut state.interaction;
    match property {
        StateProperty::Content => state.content = decode(property, value)?,
        StateProperty::ParamChanges => state.param_changes = decode(property, value)?,
        StateProperty::WidgetId => interaction.id = decode(property, value)?,
        StateProperty::WidgetCustomizationArgs => {
            interaction.customization_args = decode(property, value)?
        }
        StateProperty::AnswerGroups => interaction.answer_groups = decode(property, value)?,
        StateProperty::ConfirmedUnclassifiedAnswers => {
            interaction.confirmed_unclassified_answers = decode(property, value)?
        }
        StateProperty::DefaultOutcome => interaction.default_outcome = decode(property, value)?,
        StateProperty::Hints => interaction.hints = decode(property, value)?,
        StateProperty::Solution => interaction.solution = decode(property, value)?,
        StateProperty::SolicitAnswerDetails => {
            state.solicit_answer_details = decode(property, value)?
        }
        StateProperty::RecordedVoiceovers => state.recorded_voiceovers = decode(property, value)?,
        StateProperty::WrittenTranslations => {
            state.written_translations = decode(property, value)?
        }
    }
    Ok(())
}

/// The one place an exploration is edited.
///
/// Every successful mutation lands in the [`ChangeList`] in the order the
/// backend has to replay it. Classification and warnings run against the
/// session's current graph.
#[derive(Debug, Clone, Default)]
pub struct ExplorationEditingSession {
    graph: StateGraph,
    param_changes: Vec<ParamChange>,
    change_list: ChangeList,
}

impl ExplorationEditingSession {
    pub fn new(graph: StateGraph, param_changes: Vec<ParamChange>) -> Self {
        Self {
            graph,
            param_changes,
            change_list: ChangeList::new(),
        }
    }

    pub fn from_dict(dict: ExplorationDict) -> Self {
        let param_changes = dict.param_changes.clone();
        Self::new(StateGraph::from_dict(dict), param_changes)
    }

    pub fn graph(&self) -> &StateGraph {
        &self.graph
    }

    pub fn init_state_name(&self) -> Option<&str> {
        self.graph.init_state_name()
    }

    pub fn param_changes(&self) -> &[ParamChange] {
        &self.param_changes
    }

    pub fn change_list(&self) -> &ChangeList {
        &self.change_list
    }

    pub fn change_list_mut(&mut self) -> &mut ChangeList {
        &mut self.change_list
    }

    pub fn add_state(&mut self, name: &str) -> SessionResult<String> {
        let had_init = self.graph.init_state_name().is_some();
        let name = self.graph.add_state(name)?;
        self.change_list.push(ExplorationChange::AddState {
            state_name: name.clone(),
        });
        if !had_init {
            self.change_list.push(ExplorationChange::EditExplorationProperty {
                property_name: ExplorationProperty::InitStateName,
                old_value: Value::Null,
                new_value: Value::String(name.clone()),
            });
        }
        Ok(name)
    }

    /// Renames a card. When it was the initial card, the init name change is
    /// recorded after the rename so the backend sees the new card first.
    pub fn rename_state(&mut self, old_name: &str, new_name: &str) -> SessionResult<String> {
        let was_init = self.graph.init_state_name() == Some(old_name);
        let new_name = self.graph.rename_state(old_name, new_name)?;
        if new_name == old_name {
            return Ok(new_name);
        }
        self.change_list.push(ExplorationChange::RenameState {
            old_state_name: old_name.to_string(),
            new_state_name: new_name.clone(),
        });
        if was_init {
            self.change_list.push(ExplorationChange::EditExplorationProperty {
                property_name: ExplorationProperty::InitStateName,
                old_value: Value::String(old_name.to_string()),
                new_value: Value::String(new_name.clone()),
            });
        }
        Ok(new_name)
    }

    pub fn delete_state(&mut self, name: &str) -> SessionResult<State> {
        let removed = self.graph.delete_state(name)?;
        self.change_list.push(ExplorationChange::DeleteState {
            state_name: name.to_string(),
        });
        Ok(removed)
    }

    pub fn set_init_state_name(&mut self, name: &str) -> SessionResult<bool> {
        let old = self.graph.init_state_name().map(str::to_string);
        if old.as_deref() == Some(name) {
            return Ok(false);
        }
        self.graph.set_init_state_name(name)?;
        self.change_list.push(ExplorationChange::EditExplorationProperty {
            property_name: ExplorationProperty::InitStateName,
            old_value: old.map(Value::String).unwrap_or(Value::Null),
            new_value: Value::String(name.to_string()),
        });
        Ok(true)
    }

    pub fn set_param_changes(&mut self, param_changes: Vec<ParamChange>) -> SessionResult<bool> {
        if param_changes == self.param_changes {
            return Ok(false);
        }
        let property = StateProperty::ParamChanges;
        let old_value = encode(property, &self.param_changes)?;
        let new_value = encode(property, &param_changes)?;
        self.param_changes = param_changes;
        self.change_list.push(ExplorationChange::EditExplorationProperty {
            property_name: ExplorationProperty::ParamChanges,
            old_value,
            new_value,
        });
        Ok(true)
    }

    /// Current value of a card property, suitable as `old_value` for
    /// [`record_edit`](Self::record_edit).
    pub fn state_property(&self, state_name: &str, property: StateProperty) -> SessionResult<Value> {
        let state = self
            .graph
            .get_state(state_name)
            .ok_or_else(|| SessionError::StateNotFound(state_name.to_string()))?;
        read_property(state, property)
    }

    /// Applies `new_value` to a card property and records the edit.
    ///
    /// Returns `false` without touching anything when both values are equal.
    /// Content ids that appear or disappear are reconciled in the card's
    /// voiceover and translation mappings.
    #[instrument(level = "debug", skip(self, old_value, new_value))]
    pub fn record_edit(
        &mut self,
        state_name: &str,
        property: StateProperty,
        old_value: Value,
        new_value: Value,
    ) -> SessionResult<bool> {
        if old_value == new_value {
            debug!("edit is a no-op");
            return Ok(false);
        }
        let edit = diff_state_property(property, &old_value, &new_value)?;
        let state = self
            .graph
            .get_state_mut(state_name)
            .ok_or_else(|| SessionError::StateNotFound(state_name.to_string()))?;
        write_property(state, property, &new_value)?;
        edit.apply(state);
        debug!(
            added = edit.content_ids_to_add.len(),
            deleted = edit.content_ids_to_delete.len(),
            "reconciled content ids"
        );
        self.change_list.push(ExplorationChange::EditStateProperty {
            state_name: state_name.to_string(),
            property_name: property,
            old_value,
            new_value,
        });
        Ok(true)
    }

    /// Same as [`record_edit`](Self::record_edit) with the property given by
    /// its backend name.
    pub fn record_edit_by_name(
        &mut self,
        state_name: &str,
        property_name: &str,
        old_value: Value,
        new_value: Value,
    ) -> SessionResult<bool> {
        let property = StateProperty::parse(property_name)?;
        self.record_edit(state_name, property, old_value, new_value)
    }

    pub fn classify(
        &self,
        classifier: &AnswerClassifier,
        state_name: &str,
        answer: &AnswerValue,
    ) -> InternalResult<ClassificationResult> {
        let state = self
            .graph
            .get_state(state_name)
            .ok_or_else(|| SessionError::StateNotFound(state_name.to_string()))?;
        Ok(classifier.classify_with_registry_rules(state_name, &state.interaction, answer)?)
    }

    pub fn update_warnings(&self, warnings: &mut ExplorationWarnings) {
        let init_state_name = self.graph.init_state_name().unwrap_or_default();
        warnings.update_warnings(&self.graph, init_state_name, &self.param_changes);
        info!(changes = self.change_list.len(), "refreshed warnings for session");
    }

    pub fn to_dict(&self) -> ExplorationDict {
        self.graph.to_dict(&self.param_changes)
    }
}

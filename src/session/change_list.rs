use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::EnumIter;
use tracing::debug;

use super::{SessionError, SessionResult};

/// Editable properties of a card, under their backend names.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StateProperty {
    Content,
    ParamChanges,
    WidgetId,
    WidgetCustomizationArgs,
    AnswerGroups,
    ConfirmedUnclassifiedAnswers,
    DefaultOutcome,
    Hints,
    Solution,
    SolicitAnswerDetails,
    RecordedVoiceovers,
    WrittenTranslations,
}

impl StateProperty {
    pub fn parse(name: &str) -> SessionResult<Self> {
        Self::from_str(name).map_err(|_| SessionError::UnknownProperty(name.to_string()))
    }

    /// Whether edits of this property can add or remove translatable content.
    pub fn carries_content_ids(&self) -> bool {
        matches!(
            self,
            StateProperty::AnswerGroups
                | StateProperty::DefaultOutcome
                | StateProperty::Hints
                | StateProperty::Solution
        )
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ExplorationProperty {
    InitStateName,
    ParamChanges,
    Title,
}

/// One entry of the change list, in the backend's `cmd`-tagged shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum ExplorationChange {
    AddState {
        state_name: String,
    },
    RenameState {
        old_state_name: String,
        new_state_name: String,
    },
    DeleteState {
        state_name: String,
    },
    EditStateProperty {
        state_name: String,
        property_name: StateProperty,
        old_value: Value,
        new_value: Value,
    },
    EditExplorationProperty {
        property_name: ExplorationProperty,
        old_value: Value,
        new_value: Value,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeList {
    changes: Vec<ExplorationChange>,
}

impl ChangeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, change: ExplorationChange) {
        debug!(?change, "recorded change");
        self.changes.push(change);
    }

    pub fn changes(&self) -> &[ExplorationChange] {
        &self.changes
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Hands the pending changes to the caller, e.g. for saving.
    pub fn take(&mut self) -> Vec<ExplorationChange> {
        std::mem::take(&mut self.changes)
    }

    pub fn discard(&mut self) {
        self.changes.clear();
    }
}

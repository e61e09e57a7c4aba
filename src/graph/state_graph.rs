use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    names::{normalize_whitespace, validate_state_name, DEFAULT_MAX_STATE_NAME_LENGTH},
    types::{ParamChange, State, END_DEST},
    GraphError, GraphResult,
};

/// Backend payload for a whole exploration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplorationDict {
    #[serde(default, alias = "init_state_name")]
    pub init_state_name: Option<String>,
    #[serde(default)]
    pub states: BTreeMap<String, State>,
    #[serde(default, alias = "param_changes")]
    pub param_changes: Vec<ParamChange>,
    #[serde(default)]
    pub title: String,
}

/// A reference from an outcome to a card that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct DanglingDestination {
    pub state_name: String,
    pub dest: String,
}

/// The authoritative name -> card mapping of one exploration.
///
/// Names are unique and every stored [`State`] carries its own name, so the
/// graph never holds two copies of the same card.
#[derive(Debug, Clone)]
pub struct StateGraph {
    states: BTreeMap<String, State>,
    init_state_name: Option<String>,
    max_state_name_length: usize,
}

impl Default for StateGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl StateGraph {
    pub fn new() -> Self {
        Self {
            states: BTreeMap::new(),
            init_state_name: None,
            max_state_name_length: DEFAULT_MAX_STATE_NAME_LENGTH,
        }
    }

    pub fn with_max_state_name_length(mut self, max_length: usize) -> Self {
        self.max_state_name_length = max_length;
        self
    }

    /// Builds a graph from already named states, without name validation.
    /// Backend data is trusted the same way the editor trusts it on load.
    pub fn from_states(states: impl IntoIterator<Item = (String, State)>) -> Self {
        let mut graph = Self::new();
        for (name, mut state) in states {
            state.name = name.clone();
            graph.states.insert(name, state);
        }
        graph
    }

    pub fn from_dict(dict: ExplorationDict) -> Self {
        let init_state_name = dict.init_state_name;
        let mut graph = Self::from_states(dict.states);
        graph.init_state_name = init_state_name;
        graph
    }

    pub fn from_json(json: &str) -> GraphResult<Self> {
        let dict: ExplorationDict =
            serde_json::from_str(json).map_err(|e| GraphError::Parse(e.to_string()))?;
        Ok(Self::from_dict(dict))
    }

    pub fn init_state_name(&self) -> Option<&str> {
        self.init_state_name.as_deref()
    }

    pub fn set_init_state_name(&mut self, name: impl Into<String>) -> GraphResult<()> {
        let name = name.into();
        if !self.states.contains_key(&name) {
            return Err(GraphError::StateNotFound(name));
        }
        self.init_state_name = Some(name);
        Ok(())
    }

    pub fn state_names(&self) -> Vec<String> {
        self.states.keys().cloned().collect()
    }

    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.states.values()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn has_state(&self, name: &str) -> bool {
        self.states.contains_key(name)
    }

    pub fn get_state(&self, name: &str) -> Option<&State> {
        self.states.get(name)
    }

    pub fn get_state_mut(&mut self, name: &str) -> Option<&mut State> {
        self.states.get_mut(name)
    }

    /// Adds a fresh card named `name` after normalizing its whitespace and
    /// returns the name actually stored.
    pub fn add_state(&mut self, name: &str) -> GraphResult<String> {
        let name = self.checked_new_name(name)?;
        debug!(state = %name, "adding state");
        self.states.insert(name.clone(), State::new(name.clone()));
        if self.init_state_name.is_none() {
            self.init_state_name = Some(name.clone());
        }
        Ok(name)
    }

    /// Renames a card and rewires every destination that pointed at it.
    pub fn rename_state(&mut self, old_name: &str, new_name: &str) -> GraphResult<String> {
        if !self.states.contains_key(old_name) {
            return Err(GraphError::StateNotFound(old_name.to_string()));
        }
        let new_name = normalize_whitespace(new_name);
        if new_name == old_name {
            return Ok(new_name);
        }
        let new_name = self.checked_new_name(&new_name)?;
        let mut state = self
            .states
            .remove(old_name)
            .ok_or_else(|| GraphError::StateNotFound(old_name.to_string()))?;
        state.name = new_name.clone();
        self.states.insert(new_name.clone(), state);

        let mut rewired = 0usize;
        for state in self.states.values_mut() {
            for outcome in state.interaction.outcomes_mut() {
                if outcome.dest.as_deref() == Some(old_name) {
                    outcome.dest = Some(new_name.clone());
                    rewired += 1;
                }
            }
        }
        if self.init_state_name.as_deref() == Some(old_name) {
            self.init_state_name = Some(new_name.clone());
        }
        debug!(from = old_name, to = %new_name, rewired, "renamed state");
        Ok(new_name)
    }

    /// Removes a card. Outcomes of other cards that led here become
    /// self-loops on their own card.
    pub fn delete_state(&mut self, name: &str) -> GraphResult<State> {
        if self.init_state_name.as_deref() == Some(name) {
            return Err(GraphError::CannotDeleteInitialState(name.to_string()));
        }
        let removed = self
            .states
            .remove(name)
            .ok_or_else(|| GraphError::StateNotFound(name.to_string()))?;
        for (other_name, state) in self.states.iter_mut() {
            for outcome in state.interaction.outcomes_mut() {
                if outcome.dest.as_deref() == Some(name) {
                    outcome.dest = Some(other_name.clone());
                }
            }
        }
        debug!(state = name, "deleted state");
        Ok(removed)
    }

    /// Distinct destinations reachable in one step from `name`. A missing
    /// destination counts as an edge back to the card itself.
    pub fn destinations(&self, name: &str) -> BTreeSet<String> {
        self.states
            .get(name)
            .map(|state| {
                state
                    .interaction
                    .outcomes()
                    .map(|outcome| outcome.destination(name).to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn dangling_destinations(&self) -> Vec<DanglingDestination> {
        let mut dangling = BTreeSet::new();
        for (name, state) in &self.states {
            for outcome in state.interaction.outcomes() {
                let Some(dest) = outcome.dest.as_deref() else {
                    continue;
                };
                if !dest.is_empty() && dest != END_DEST && !self.states.contains_key(dest) {
                    dangling.insert(DanglingDestination {
                        state_name: name.clone(),
                        dest: dest.to_string(),
                    });
                }
            }
        }
        dangling.into_iter().collect()
    }

    pub fn to_dict(&self, param_changes: &[ParamChange]) -> ExplorationDict {
        ExplorationDict {
            init_state_name: self.init_state_name.clone(),
            states: self.states.clone(),
            param_changes: param_changes.to_vec(),
            title: String::new(),
        }
    }

    fn checked_new_name(&self, name: &str) -> GraphResult<String> {
        let name = normalize_whitespace(name);
        validate_state_name(&name, self.max_state_name_length)?;
        if self.states.contains_key(&name) {
            return Err(GraphError::DuplicateStateName(name));
        }
        Ok(name)
    }
}

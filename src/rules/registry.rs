use std::{collections::HashMap, fmt, sync::Arc};

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    builtin::{MultipleChoiceInputRules, NumericInputRules, TextInputRules},
    evaluator::RuleEvaluator,
};

/// Static facts about an interaction type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionSpec {
    pub id: String,
    /// Answers can be classified from examples rather than rules alone.
    #[serde(default)]
    pub is_trainable: bool,
    /// Reaching a card with this interaction completes the exploration.
    #[serde(default)]
    pub is_terminal: bool,
}

impl InteractionSpec {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_trainable: false,
            is_terminal: false,
        }
    }

    pub fn trainable(mut self) -> Self {
        self.is_trainable = true;
        self
    }

    pub fn terminal(mut self) -> Self {
        self.is_terminal = true;
        self
    }
}

pub const TEXT_INPUT: &str = "TextInput";
pub const NUMERIC_INPUT: &str = "NumericInput";
pub const MULTIPLE_CHOICE_INPUT: &str = "MultipleChoiceInput";
pub const CONTINUE: &str = "Continue";
pub const END_EXPLORATION: &str = "EndExploration";

lazy_static! {
    static ref BUILTIN_SPECS: Vec<InteractionSpec> = vec![
        InteractionSpec::new(TEXT_INPUT).trainable(),
        InteractionSpec::new(NUMERIC_INPUT),
        InteractionSpec::new(MULTIPLE_CHOICE_INPUT),
        InteractionSpec::new(CONTINUE),
        InteractionSpec::new(END_EXPLORATION).terminal(),
    ];
}

/// Interaction specs plus the rule evaluator of each interaction type.
///
/// Built once at startup from the built-in families; hosts add their own
/// interaction types through [`register_spec`](Self::register_spec) and
/// [`register_rules`](Self::register_rules).
#[derive(Clone, Default)]
pub struct InteractionRegistry {
    specs: HashMap<String, InteractionSpec>,
    rules: HashMap<String, Arc<dyn RuleEvaluator>>,
}

impl fmt::Debug for InteractionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ruled: Vec<_> = self.rules.keys().collect();
        ruled.sort();
        f.debug_struct("InteractionRegistry")
            .field("specs", &self.specs)
            .field("rules", &ruled)
            .finish()
    }
}

impl InteractionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for spec in BUILTIN_SPECS.iter() {
            registry.register_spec(spec.clone());
        }
        registry.register_rules(TEXT_INPUT, Arc::new(TextInputRules));
        registry.register_rules(NUMERIC_INPUT, Arc::new(NumericInputRules));
        registry.register_rules(MULTIPLE_CHOICE_INPUT, Arc::new(MultipleChoiceInputRules));
        registry
    }

    pub fn register_spec(&mut self, spec: InteractionSpec) {
        debug!(interaction = %spec.id, "registering interaction spec");
        self.specs.insert(spec.id.clone(), spec);
    }

    pub fn register_rules(&mut self, interaction_id: impl Into<String>, rules: Arc<dyn RuleEvaluator>) {
        self.rules.insert(interaction_id.into(), rules);
    }

    pub fn spec(&self, interaction_id: &str) -> Option<&InteractionSpec> {
        self.specs.get(interaction_id)
    }

    pub fn rules_for(&self, interaction_id: &str) -> Option<&dyn RuleEvaluator> {
        self.rules.get(interaction_id).map(|rules| rules.as_ref())
    }

    pub fn is_trainable(&self, interaction_id: &str) -> bool {
        self.spec(interaction_id).is_some_and(|spec| spec.is_trainable)
    }

    pub fn is_terminal(&self, interaction_id: &str) -> bool {
        self.spec(interaction_id).is_some_and(|spec| spec.is_terminal)
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A learner answer or a rule input. The shape depends on the interaction
/// (plain strings, numbers, fraction dicts, ...), so it stays untyped.
pub type AnswerValue = serde_json::Value;

/// Named inputs of a single rule, e.g. `{"x": 10}`.
pub type RuleInputs = BTreeMap<String, AnswerValue>;

/// content id -> language code -> opaque voiceover/translation payload.
pub type ContentIdMap = BTreeMap<String, BTreeMap<String, serde_json::Value>>;

/// Destination sentinel that finishes the exploration without a terminal card.
pub const END_DEST: &str = "END";

/// A block of HTML addressed by a content id, so voiceovers and translations
/// can refer to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtitledHtml {
    #[serde(default, alias = "content_id")]
    pub content_id: String,
    #[serde(default)]
    pub html: String,
}

impl SubtitledHtml {
    pub fn new(content_id: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            content_id: content_id.into(),
            html: html.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.html.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParamChangeArgs {
    #[serde(default)]
    pub parse_with_jinja: bool,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub list_of_values: Vec<String>,
}

/// Assignment of a value to an exploration parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamChange {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_generator_id", alias = "generator_id")]
    pub generator_id: String,
    #[serde(default, alias = "customization_args")]
    pub customization_args: ParamChangeArgs,
}

pub const COPIER_GENERATOR: &str = "Copier";
pub const RANDOM_SELECTOR_GENERATOR: &str = "RandomSelector";

fn default_generator_id() -> String {
    COPIER_GENERATOR.to_string()
}

impl ParamChange {
    pub fn copier(name: impl Into<String>, value: impl Into<String>, parse_with_jinja: bool) -> Self {
        Self {
            name: name.into(),
            generator_id: COPIER_GENERATOR.to_string(),
            customization_args: ParamChangeArgs {
                parse_with_jinja,
                value: Some(value.into()),
                list_of_values: vec![],
            },
        }
    }

    pub fn random_selector(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            generator_id: RANDOM_SELECTOR_GENERATOR.to_string(),
            customization_args: ParamChangeArgs {
                parse_with_jinja: false,
                value: None,
                list_of_values: values,
            },
        }
    }

    /// The source string whose `{{ }}` blocks are read when this change runs.
    /// Only jinja-enabled copiers read other parameters.
    pub fn templated_value(&self) -> Option<&str> {
        if self.generator_id == COPIER_GENERATOR && self.customization_args.parse_with_jinja {
            self.customization_args.value.as_deref()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    /// `None` keeps the learner on the current card.
    #[serde(default)]
    pub dest: Option<String>,
    #[serde(default)]
    pub feedback: SubtitledHtml,
    #[serde(default, alias = "labelled_as_correct")]
    pub labelled_as_correct: bool,
    #[serde(default, alias = "param_changes")]
    pub param_changes: Vec<ParamChange>,
    #[serde(default, alias = "refresher_exploration_id")]
    pub refresher_exploration_id: Option<String>,
    #[serde(default, alias = "missing_prerequisite_skill_id")]
    pub missing_prerequisite_skill_id: Option<String>,
}

impl Outcome {
    pub fn new(dest: impl Into<String>, feedback: SubtitledHtml) -> Self {
        Self {
            dest: Some(dest.into()),
            feedback,
            ..Default::default()
        }
    }

    pub fn labelled_correct(mut self) -> Self {
        self.labelled_as_correct = true;
        self
    }

    /// Resolves the destination, treating a missing one as a self-loop.
    pub fn destination<'a>(&'a self, current_state: &'a str) -> &'a str {
        self.dest.as_deref().unwrap_or(current_state)
    }

    pub fn has_nonempty_feedback(&self) -> bool {
        !self.feedback.is_empty()
    }

    /// A self-loop with no feedback leaves the learner with no signal at all.
    pub fn is_confusing(&self, current_state: &str) -> bool {
        self.destination(current_state) == current_state && !self.has_nonempty_feedback()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSpec {
    #[serde(alias = "rule_type")]
    pub rule_type: String,
    #[serde(default)]
    pub inputs: RuleInputs,
}

impl RuleSpec {
    pub fn new(rule_type: impl Into<String>, inputs: RuleInputs) -> Self {
        Self {
            rule_type: rule_type.into(),
            inputs,
        }
    }

    /// Shorthand for the common single-input `{"x": value}` rule.
    pub fn with_x(rule_type: impl Into<String>, x: AnswerValue) -> Self {
        let mut inputs = RuleInputs::new();
        inputs.insert("x".to_string(), x);
        Self::new(rule_type, inputs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerGroup {
    #[serde(default, alias = "rule_specs", alias = "rules")]
    pub rule_specs: Vec<RuleSpec>,
    #[serde(default)]
    pub outcome: Outcome,
    #[serde(default, alias = "training_data")]
    pub training_data: Vec<AnswerValue>,
    #[serde(default, alias = "tagged_skill_misconception_id")]
    pub tagged_skill_misconception_id: Option<String>,
}

impl AnswerGroup {
    pub fn new(rule_specs: Vec<RuleSpec>, outcome: Outcome) -> Self {
        Self {
            rule_specs,
            outcome,
            ..Default::default()
        }
    }

    pub fn with_training_data(mut self, training_data: Vec<AnswerValue>) -> Self {
        self.training_data = training_data;
        self
    }

    /// Neither rules nor examples: nothing can ever land in this group.
    pub fn has_empty_classifier(&self) -> bool {
        self.rule_specs.is_empty() && self.training_data.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    #[serde(default, alias = "hint_content")]
    pub hint_content: SubtitledHtml,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Solution {
    #[serde(default, alias = "answer_is_exclusive")]
    pub answer_is_exclusive: bool,
    #[serde(alias = "correct_answer")]
    pub correct_answer: AnswerValue,
    #[serde(default)]
    pub explanation: SubtitledHtml,
}

impl Solution {
    pub fn new(answer_is_exclusive: bool, correct_answer: AnswerValue, explanation: SubtitledHtml) -> Self {
        Self {
            answer_is_exclusive,
            correct_answer,
            explanation,
        }
    }
}

/// A single customization argument as stored by the backend: `{"value": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomizationArg {
    pub value: serde_json::Value,
}

pub type CustomizationArgs = BTreeMap<String, CustomizationArg>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, alias = "answer_groups")]
    pub answer_groups: Vec<AnswerGroup>,
    #[serde(default, alias = "default_outcome")]
    pub default_outcome: Option<Outcome>,
    #[serde(default)]
    pub hints: Vec<Hint>,
    #[serde(default)]
    pub solution: Option<Solution>,
    #[serde(default, alias = "customization_args")]
    pub customization_args: CustomizationArgs,
    #[serde(default, alias = "confirmed_unclassified_answers")]
    pub confirmed_unclassified_answers: Vec<AnswerValue>,
}

impl Interaction {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    pub fn interaction_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn customization_arg(&self, name: &str) -> Option<&serde_json::Value> {
        self.customization_args.get(name).map(|arg| &arg.value)
    }

    pub fn set_customization_arg(&mut self, name: impl Into<String>, value: serde_json::Value) {
        self.customization_args
            .insert(name.into(), CustomizationArg { value });
    }

    /// Every outcome of this interaction: answer groups first, default last.
    pub fn outcomes(&self) -> impl Iterator<Item = &Outcome> {
        self.answer_groups
            .iter()
            .map(|group| &group.outcome)
            .chain(self.default_outcome.iter())
    }

    pub fn outcomes_mut(&mut self) -> impl Iterator<Item = &mut Outcome> {
        self.answer_groups
            .iter_mut()
            .map(|group| &mut group.outcome)
            .chain(self.default_outcome.iter_mut())
    }
}

/// Shared bookkeeping for the per-content-id mappings of a state.
pub trait ContentIdRegistry {
    fn mapping(&self) -> &ContentIdMap;
    fn mapping_mut(&mut self) -> &mut ContentIdMap;

    fn has_content_id(&self, content_id: &str) -> bool {
        self.mapping().contains_key(content_id)
    }

    fn add_content_id(&mut self, content_id: &str) {
        self.mapping_mut()
            .entry(content_id.to_string())
            .or_default();
    }

    fn delete_content_id(&mut self, content_id: &str) {
        self.mapping_mut().remove(content_id);
    }

    fn content_ids(&self) -> Vec<&str> {
        self.mapping().keys().map(String::as_str).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedVoiceovers {
    #[serde(default, alias = "voiceovers_mapping")]
    pub voiceovers_mapping: ContentIdMap,
}

impl ContentIdRegistry for RecordedVoiceovers {
    fn mapping(&self) -> &ContentIdMap {
        &self.voiceovers_mapping
    }

    fn mapping_mut(&mut self) -> &mut ContentIdMap {
        &mut self.voiceovers_mapping
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrittenTranslations {
    #[serde(default, alias = "translations_mapping")]
    pub translations_mapping: ContentIdMap,
}

impl ContentIdRegistry for WrittenTranslations {
    fn mapping(&self) -> &ContentIdMap {
        &self.translations_mapping
    }

    fn mapping_mut(&mut self) -> &mut ContentIdMap {
        &mut self.translations_mapping
    }
}

/// One card of an exploration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    /// Filled in by the owning graph; the backend keys states by name instead.
    #[serde(skip)]
    pub name: String,
    #[serde(default)]
    pub content: SubtitledHtml,
    #[serde(default, alias = "param_changes")]
    pub param_changes: Vec<ParamChange>,
    #[serde(default)]
    pub interaction: Interaction,
    #[serde(default, alias = "recorded_voiceovers")]
    pub recorded_voiceovers: RecordedVoiceovers,
    #[serde(default, alias = "written_translations")]
    pub written_translations: WrittenTranslations,
    #[serde(default, alias = "solicit_answer_details")]
    pub solicit_answer_details: bool,
    #[serde(default, alias = "classifier_model_id")]
    pub classifier_model_id: Option<String>,
}

impl State {
    /// A fresh card the way an author gets it: content and default outcome
    /// registered for voiceovers and translations, looping back to itself.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let mut state = Self {
            name: name.clone(),
            content: SubtitledHtml::new("content", ""),
            interaction: Interaction {
                default_outcome: Some(Outcome::new(
                    name,
                    SubtitledHtml::new("default_outcome", ""),
                )),
                ..Default::default()
            },
            ..Default::default()
        };
        for content_id in ["content", "default_outcome"] {
            state.recorded_voiceovers.add_content_id(content_id);
            state.written_translations.add_content_id(content_id);
        }
        state
    }

    /// HTML blocks shown to the learner as feedback, in outcome order.
    pub fn feedback_html(&self) -> impl Iterator<Item = &str> {
        self.interaction
            .outcomes()
            .map(|outcome| outcome.feedback.html.as_str())
    }
}

//! Per-interaction structural checks run by the warnings analyzer.
//!
//! Each validator returns human readable messages in a fixed order. An empty
//! list means the card's interaction is well formed.

use std::collections::HashSet;

use serde_json::Value;

use crate::{
    graph::{AnswerGroup, Interaction, Outcome},
    rules::registry::{CONTINUE, END_EXPLORATION, MULTIPLE_CHOICE_INPUT, TEXT_INPUT},
};

pub const MISSING_INTERACTION: &str = "Please add an interaction to this card.";

pub const MIN_TEXT_ROWS: i64 = 1;
pub const MAX_TEXT_ROWS: i64 = 200;

pub trait InteractionValidator: Send + Sync {
    fn validate(&self, state_name: &str, interaction: &Interaction) -> Vec<String>;
}

/// Returns the validator for an interaction type. Types without a dedicated
/// validator only get the answer group checks.
pub fn validator_for(interaction_id: &str) -> &'static dyn InteractionValidator {
    match interaction_id {
        TEXT_INPUT => &TextInputValidator,
        CONTINUE => &ContinueValidator,
        END_EXPLORATION => &EndExplorationValidator,
        MULTIPLE_CHOICE_INPUT => &MultipleChoiceInputValidator,
        _ => &BaseValidator,
    }
}

/// Messages for one card; a card without an interaction only gets
/// [`MISSING_INTERACTION`].
pub fn validate_interaction(state_name: &str, interaction: &Interaction) -> Vec<String> {
    match interaction.interaction_id() {
        Some(id) if !id.is_empty() => validator_for(id).validate(state_name, interaction),
        _ => vec![MISSING_INTERACTION.to_string()],
    }
}

/// Answer group checks shared by the interactions that take free answers.
/// Groups are numbered from 1, as authors see them.
pub fn answer_group_warnings(state_name: &str, answer_groups: &[AnswerGroup]) -> Vec<String> {
    let mut warnings = Vec::new();
    for (i, group) in answer_groups.iter().enumerate() {
        let outcome: &Outcome = &group.outcome;
        if outcome.is_confusing(state_name) {
            warnings.push(format!(
                "Please specify what Oppia should do in answer group {}.",
                i + 1
            ));
        }
        if outcome.destination(state_name) == state_name && outcome.labelled_as_correct {
            warnings.push(format!(
                "In answer group {}, self-loops should not be labelled as correct.",
                i + 1
            ));
        }
    }
    warnings
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BaseValidator;

impl InteractionValidator for BaseValidator {
    fn validate(&self, state_name: &str, interaction: &Interaction) -> Vec<String> {
        answer_group_warnings(state_name, &interaction.answer_groups)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TextInputValidator;

impl InteractionValidator for TextInputValidator {
    fn validate(&self, state_name: &str, interaction: &Interaction) -> Vec<String> {
        let mut warnings = Vec::new();
        if let Some(placeholder) = interaction.customization_arg("placeholder") {
            // Newer payloads wrap the placeholder in a subtitled unicode dict.
            let is_text = placeholder.is_string()
                || placeholder
                    .get("unicode_str")
                    .or_else(|| placeholder.get("unicodeStr"))
                    .is_some_and(Value::is_string);
            if !is_text {
                warnings.push("Placeholder text must be a string.".to_string());
            }
        }
        if let Some(rows) = interaction.customization_arg("rows") {
            // `3.0` counts as integral.
            match rows.as_f64().filter(|rows| rows.fract() == 0.0) {
                None => warnings.push("Number of rows must be integral.".to_string()),
                Some(rows)
                    if !(MIN_TEXT_ROWS as f64..=MAX_TEXT_ROWS as f64).contains(&rows) =>
                {
                    warnings.push(format!(
                        "Number of rows must be between {} and {}.",
                        MIN_TEXT_ROWS, MAX_TEXT_ROWS
                    ))
                }
                Some(_) => {}
            }
        }
        warnings.extend(answer_group_warnings(state_name, &interaction.answer_groups));
        warnings
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ContinueValidator;

impl InteractionValidator for ContinueValidator {
    fn validate(&self, _state_name: &str, interaction: &Interaction) -> Vec<String> {
        let mut warnings = Vec::new();
        let button_text = interaction
            .customization_arg("buttonText")
            .and_then(|value| {
                value
                    .as_str()
                    .or_else(|| value.get("unicode_str").and_then(Value::as_str))
                    .or_else(|| value.get("unicodeStr").and_then(Value::as_str))
            })
            .unwrap_or_default();
        if button_text.trim().is_empty() {
            warnings.push("The button text should not be empty.".to_string());
        }
        if !interaction.answer_groups.is_empty() {
            warnings
                .push("Only the default outcome is necessary for a continue interaction.".to_string());
        }
        if interaction.default_outcome.is_none() {
            warnings.push(
                "Please specify what Oppia should do after the button is clicked.".to_string(),
            );
        }
        warnings
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EndExplorationValidator;

impl InteractionValidator for EndExplorationValidator {
    fn validate(&self, _state_name: &str, interaction: &Interaction) -> Vec<String> {
        let mut warnings = Vec::new();
        if !interaction.answer_groups.is_empty() {
            warnings.push(
                "Please make sure end exploration interactions do not have any answer groups."
                    .to_string(),
            );
        }
        if interaction.default_outcome.is_some() {
            warnings.push(
                "Please make sure end exploration interactions do not have a default outcome."
                    .to_string(),
            );
        }
        let recommended = interaction
            .customization_arg("recommendedExplorationIds")
            .and_then(Value::as_array);
        if recommended.is_some_and(|ids| ids.iter().any(|id| !id.is_string())) {
            warnings.push("Recommended exploration ID must be a string.".to_string());
        }
        warnings
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MultipleChoiceInputValidator;

impl MultipleChoiceInputValidator {
    /// Choices are either plain HTML strings or subtitled HTML dicts.
    fn choice_html(choice: &Value) -> Option<&str> {
        choice
            .as_str()
            .or_else(|| choice.get("html").and_then(Value::as_str))
    }
}

impl InteractionValidator for MultipleChoiceInputValidator {
    fn validate(&self, state_name: &str, interaction: &Interaction) -> Vec<String> {
        let mut warnings = Vec::new();
        let choices: Vec<&str> = interaction
            .customization_arg("choices")
            .and_then(Value::as_array)
            .map(|choices| {
                choices
                    .iter()
                    .map(|choice| Self::choice_html(choice).unwrap_or_default())
                    .collect()
            })
            .unwrap_or_default();
        if choices.iter().any(|html| html.trim().is_empty()) {
            warnings.push("Please ensure the choices are nonempty.".to_string());
        }
        let mut seen = HashSet::new();
        if !choices.iter().all(|html| seen.insert(*html)) {
            warnings.push("Please ensure the choices are unique.".to_string());
        }
        warnings.extend(answer_group_warnings(state_name, &interaction.answer_groups));
        warnings
    }
}

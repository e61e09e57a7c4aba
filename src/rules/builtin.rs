//! Rule families of the interactions shipped with the engine.
//!
//! Each family parses the rule-type name into its own tag enum once and then
//! dispatches on the variant, so an unknown rule name surfaces as
//! [`RuleError::UnknownRuleType`] instead of silently evaluating to `false`.

use std::str::FromStr;

use strum_macros::EnumIter;

use crate::graph::{AnswerValue, RuleInputs};

use super::{
    evaluator::{input, number_input, RuleEvaluator},
    RuleError, RuleResult,
};

/// Lowercases and collapses whitespace the way free-text answers are compared.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Levenshtein distance over chars.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}

fn parse_rule<T: FromStr>(interaction_id: &str, rule_type: &str) -> RuleResult<T> {
    T::from_str(rule_type).map_err(|_| RuleError::unknown_rule(interaction_id, rule_type))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString, EnumIter)]
pub enum TextInputRule {
    Equals,
    CaseSensitiveEquals,
    Contains,
    StartsWith,
    FuzzyEquals,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TextInputRules;

impl TextInputRules {
    /// `x` may be a single string or a list of alternatives.
    fn candidates(inputs: &RuleInputs, rule_type: &str) -> RuleResult<Vec<String>> {
        let value = input(inputs, rule_type, "x")?;
        let invalid = || RuleError::InvalidRuleInput {
            rule_type: rule_type.to_string(),
            input: "x".to_string(),
            reason: format!("expected a string or a list of strings, found {}", value),
        };
        match value {
            AnswerValue::String(s) => Ok(vec![s.clone()]),
            AnswerValue::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string).ok_or_else(invalid))
                .collect(),
            _ => Err(invalid()),
        }
    }

    fn matches(rule: TextInputRule, answer: &str, candidate: &str) -> bool {
        match rule {
            TextInputRule::Equals => normalize_text(answer) == normalize_text(candidate),
            TextInputRule::CaseSensitiveEquals => {
                let answer: Vec<_> = answer.split_whitespace().collect();
                let candidate: Vec<_> = candidate.split_whitespace().collect();
                answer == candidate
            }
            TextInputRule::Contains => normalize_text(answer).contains(&normalize_text(candidate)),
            TextInputRule::StartsWith => {
                normalize_text(answer).starts_with(&normalize_text(candidate))
            }
            TextInputRule::FuzzyEquals => {
                edit_distance(&normalize_text(answer), &normalize_text(candidate)) <= 1
            }
        }
    }
}

impl RuleEvaluator for TextInputRules {
    fn evaluate(
        &self,
        rule_type: &str,
        answer: &AnswerValue,
        inputs: &RuleInputs,
    ) -> RuleResult<bool> {
        let rule: TextInputRule = parse_rule("TextInput", rule_type)?;
        let answer = answer.as_str().ok_or_else(|| RuleError::InvalidAnswer {
            rule_type: rule_type.to_string(),
            reason: format!("expected a string, found {}", answer),
        })?;
        Ok(Self::candidates(inputs, rule_type)?
            .iter()
            .any(|candidate| Self::matches(rule, answer, candidate)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString, EnumIter)]
pub enum NumericInputRule {
    Equals,
    IsLessThan,
    IsGreaterThan,
    IsLessThanOrEqualTo,
    IsGreaterThanOrEqualTo,
    IsInclusivelyBetween,
    IsWithinTolerance,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NumericInputRules;

impl RuleEvaluator for NumericInputRules {
    fn evaluate(
        &self,
        rule_type: &str,
        answer: &AnswerValue,
        inputs: &RuleInputs,
    ) -> RuleResult<bool> {
        let rule: NumericInputRule = parse_rule("NumericInput", rule_type)?;
        let answer = answer.as_f64().ok_or_else(|| RuleError::InvalidAnswer {
            rule_type: rule_type.to_string(),
            reason: format!("expected a number, found {}", answer),
        })?;
        let x = || number_input(inputs, rule_type, "x");
        Ok(match rule {
            NumericInputRule::Equals => answer == x()?,
            NumericInputRule::IsLessThan => answer < x()?,
            NumericInputRule::IsGreaterThan => answer > x()?,
            NumericInputRule::IsLessThanOrEqualTo => answer <= x()?,
            NumericInputRule::IsGreaterThanOrEqualTo => answer >= x()?,
            NumericInputRule::IsInclusivelyBetween => {
                let a = number_input(inputs, rule_type, "a")?;
                let b = number_input(inputs, rule_type, "b")?;
                a <= answer && answer <= b
            }
            NumericInputRule::IsWithinTolerance => {
                let tol = number_input(inputs, rule_type, "tol")?;
                (answer - x()?).abs() <= tol
            }
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString, EnumIter)]
pub enum MultipleChoiceInputRule {
    Equals,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MultipleChoiceInputRules;

impl RuleEvaluator for MultipleChoiceInputRules {
    fn evaluate(
        &self,
        rule_type: &str,
        answer: &AnswerValue,
        inputs: &RuleInputs,
    ) -> RuleResult<bool> {
        let _rule: MultipleChoiceInputRule = parse_rule("MultipleChoiceInput", rule_type)?;
        let x = input(inputs, rule_type, "x")?;
        // Choice indices arrive as either integers or floats.
        Ok(match (answer.as_f64(), x.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => answer == x,
        })
    }
}

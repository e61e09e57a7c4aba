use serde::Serialize;

use crate::graph::Outcome;

/// Which strategy produced a classification.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ClassificationCategory {
    Explicit,
    StatisticalClassifier,
    TrainingDataMatch,
    DefaultOutcome,
}

/// Outcome picked for one answer, plus where it came from.
///
/// `answer_group_index` equals the number of answer groups when the default
/// outcome was used. `rule_index` is `None` for classifier and training data
/// matches, and `Some(0)` for the default outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub outcome: Outcome,
    pub answer_group_index: usize,
    pub rule_index: Option<usize>,
    pub category: ClassificationCategory,
}

impl ClassificationResult {
    pub fn new(
        outcome: Outcome,
        answer_group_index: usize,
        rule_index: Option<usize>,
        category: ClassificationCategory,
    ) -> Self {
        Self {
            outcome,
            answer_group_index,
            rule_index,
            category,
        }
    }

    pub fn is_default(&self) -> bool {
        self.category == ClassificationCategory::DefaultOutcome
    }
}

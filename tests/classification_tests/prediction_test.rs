use std::sync::Arc;

use exploration_core::{
    classifier::{
        AnswerClassifier, ClassificationCategory, ClassifierData, PredictionAlgorithmRegistry,
        PredictionService, StateClassifierMapping,
    },
    config::ClassificationConfig,
    graph::{AnswerGroup, AnswerValue, Interaction, Outcome, SubtitledHtml},
    rules::InteractionRegistry,
};
use mockall::{mock, predicate::*};
use serde_json::{json, Value};

mock! {
    pub Predictor {}

    impl PredictionService for Predictor {
        fn predict(&self, classifier_data: &Value, answer: &AnswerValue) -> Option<usize>;
    }
}

const ALGORITHM: &str = "TextClassifier";

fn interaction() -> Interaction {
    let mut interaction = Interaction::new("TextInput");
    interaction.answer_groups = vec![
        AnswerGroup::new(vec![], Outcome::new("Cats", SubtitledHtml::new("feedback_1", "Meow")))
            .with_training_data(vec![json!("kitten")]),
        AnswerGroup::new(vec![], Outcome::new("Dogs", SubtitledHtml::new("feedback_2", "Woof"))),
    ];
    interaction.default_outcome = Some(Outcome::new("Pets", SubtitledHtml::default()));
    interaction
}

fn classifier_with(predictor: MockPredictor, enable_ml_classifiers: bool) -> AnswerClassifier {
    let mut mapping = StateClassifierMapping::new();
    mapping.insert(
        "Pets",
        ClassifierData {
            algorithm_id: ALGORITHM.to_string(),
            classifier_data: json!({"weights": [0.1, 0.9]}),
            data_schema_version: 1,
        },
    );
    let mut algorithms = PredictionAlgorithmRegistry::new();
    algorithms.register(ALGORITHM, 1, Arc::new(predictor));

    let config = ClassificationConfig {
        enable_ml_classifiers,
        enable_training_data_classification: true,
    };
    AnswerClassifier::new(config, InteractionRegistry::builtin()).with_prediction(mapping, algorithms)
}

#[test]
fn test_statistical_classification_wins_over_training_data() {
    let mut predictor = MockPredictor::new();
    predictor
        .expect_predict()
        .with(eq(json!({"weights": [0.1, 0.9]})), eq(json!("kitten")))
        .times(1)
        .returning(|_, _| Some(1));

    let result = classifier_with(predictor, true)
        .classify_with_registry_rules("Pets", &interaction(), &json!("kitten"))
        .unwrap();
    assert_eq!(result.category, ClassificationCategory::StatisticalClassifier);
    assert_eq!((result.answer_group_index, result.rule_index), (1, None));
    assert_eq!(result.outcome.dest.as_deref(), Some("Dogs"));
}

#[test]
fn test_classifier_disabled_skips_prediction() {
    let mut predictor = MockPredictor::new();
    predictor.expect_predict().never();

    let result = classifier_with(predictor, false)
        .classify_with_registry_rules("Pets", &interaction(), &json!("kitten"))
        .unwrap();
    assert_eq!(result.category, ClassificationCategory::TrainingDataMatch);
    assert_eq!(result.answer_group_index, 0);
}

#[test]
fn test_unconfident_or_out_of_range_prediction_falls_through() {
    let mut predictor = MockPredictor::new();
    predictor.expect_predict().times(1).returning(|_, _| None);
    let result = classifier_with(predictor, true)
        .classify_with_registry_rules("Pets", &interaction(), &json!("hamster"))
        .unwrap();
    assert!(result.is_default());

    let mut predictor = MockPredictor::new();
    predictor.expect_predict().times(1).returning(|_, _| Some(7));
    let result = classifier_with(predictor, true)
        .classify_with_registry_rules("Pets", &interaction(), &json!("hamster"))
        .unwrap();
    assert!(result.is_default());
    assert_eq!(result.answer_group_index, 2);
}

#[test]
fn test_card_without_model_is_not_predicted() {
    let mut predictor = MockPredictor::new();
    predictor.expect_predict().never();
    let result = classifier_with(predictor, true)
        .classify_with_registry_rules("Other", &interaction(), &json!("kitten"))
        .unwrap();
    assert_eq!(result.category, ClassificationCategory::TrainingDataMatch);
}

use std::{collections::HashMap, fmt, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::graph::AnswerValue;

/// Trained model of one card as handed out by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierData {
    pub algorithm_id: String,
    /// Opaque to the engine, only the prediction service reads it.
    pub classifier_data: serde_json::Value,
    pub data_schema_version: u32,
}

/// Scores an answer against a trained model.
#[cfg_attr(test, mockall::automock)]
pub trait PredictionService: Send + Sync {
    /// Index of the predicted answer group, if the model is confident.
    fn predict(&self, classifier_data: &serde_json::Value, answer: &AnswerValue) -> Option<usize>;
}

/// Card name -> trained model.
#[derive(Debug, Clone, Default)]
pub struct StateClassifierMapping {
    mapping: HashMap<String, ClassifierData>,
}

impl StateClassifierMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, state_name: impl Into<String>, data: ClassifierData) {
        self.mapping.insert(state_name.into(), data);
    }

    pub fn get(&self, state_name: &str) -> Option<&ClassifierData> {
        self.mapping.get(state_name)
    }
}

/// (algorithm id, data schema version) -> prediction service.
#[derive(Clone, Default)]
pub struct PredictionAlgorithmRegistry {
    services: HashMap<(String, u32), Arc<dyn PredictionService>>,
}

impl fmt::Debug for PredictionAlgorithmRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.services.keys().collect();
        keys.sort();
        f.debug_struct("PredictionAlgorithmRegistry")
            .field("algorithms", &keys)
            .finish()
    }
}

impl PredictionAlgorithmRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        algorithm_id: impl Into<String>,
        data_schema_version: u32,
        service: Arc<dyn PredictionService>,
    ) {
        self.services
            .insert((algorithm_id.into(), data_schema_version), service);
    }

    pub fn get(&self, algorithm_id: &str, data_schema_version: u32) -> Option<&dyn PredictionService> {
        self.services
            .get(&(algorithm_id.to_string(), data_schema_version))
            .map(|service| service.as_ref())
    }

    /// Runs the model registered for `data`, if its algorithm is known.
    pub fn predict(&self, data: &ClassifierData, answer: &AnswerValue) -> Option<usize> {
        self.get(&data.algorithm_id, data.data_schema_version)?
            .predict(&data.classifier_data, answer)
    }
}

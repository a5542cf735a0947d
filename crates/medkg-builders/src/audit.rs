//! End-to-end audit of one model answer against a reference graph.

use crate::config::{default_age_groups, AgeGroup};
use crate::prediction::build_prediction;
use crate::vocabulary::Vocabulary;
use medkg_analysis::{AnalysisResultBundle, Analyzer};
use medkg_core::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

/// The prediction graph built from the answer and its analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub prediction: GraphDocument,
    pub bundle: AnalysisResultBundle,
}

/// Builds prediction graphs and analyzes them under one configuration.
#[derive(Debug, Clone)]
pub struct Auditor {
    analyzer: Analyzer,
    vocabulary: Vocabulary,
    age_groups: Vec<AgeGroup>,
}

impl Auditor {
    /// Rejects invalid configurations up front.
    pub fn new(config: AuditConfig, vocabulary: Vocabulary) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            analyzer: Analyzer::new(config),
            vocabulary,
            age_groups: default_age_groups(),
        })
    }

    pub fn with_age_groups(mut self, age_groups: Vec<AgeGroup>) -> Self {
        self.age_groups = age_groups;
        self
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn audit(&self, ground_truth: &GraphDocument, answer: &Value) -> Result<AuditReport> {
        let prediction = build_prediction(answer, &self.vocabulary, &self.age_groups)?;
        let pair = load_documents(ground_truth, &prediction)?;
        let bundle = self.analyzer.analyze(&pair);
        info!(
            disease = bundle.predicted_disease.as_deref().unwrap_or("<none>"),
            confidence = bundle.metrics.confidence_score,
            "audit complete"
        );
        Ok(AuditReport { prediction, bundle })
    }
}

/// Audit with the default age groups.
pub fn audit(
    ground_truth: &GraphDocument,
    answer: &Value,
    vocabulary: &Vocabulary,
    config: &AuditConfig,
) -> Result<AuditReport> {
    Auditor::new(config.clone(), vocabulary.clone())?.audit(ground_truth, answer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reference() -> GraphDocument {
        GraphDocument::from_value(
            GraphRole::GroundTruth,
            json!({
                "nodes": [
                    {"id": "Flu", "type": "Disease"},
                    {"id": "Fever", "type": "Symptom"},
                    {"id": "Cough", "type": "Symptom"}
                ],
                "links": [
                    {"source": "Flu", "target": "Fever", "relationship": "HAS_SYMPTOM", "weight": 0.9},
                    {"source": "Flu", "target": "Cough", "relationship": "HAS_SYMPTOM", "weight": 0.6}
                ]
            }),
        )
        .unwrap()
    }

    #[test]
    fn audits_a_model_answer() {
        let answer = json!({"result": [{"predicted disease": "Flu", "Fever": "Yes", "Cough": "Yes"}]});
        let report = audit(&reference(), &answer, &Vocabulary::default(), &AuditConfig::default()).unwrap();

        assert_eq!(report.prediction.links.len(), 2);
        assert!(report.bundle.is_complete());
        assert_eq!(report.bundle.reasoning_paths.reasoning_accuracy, 1.0);
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        let mut config = AuditConfig::default();
        config.scoring.accuracy_share = 0.9;
        let err = Auditor::new(config, Vocabulary::default()).unwrap_err();
        assert!(matches!(err, MedkgError::Config(ConfigError::SharesExceedOne(_))));
    }

    #[test]
    fn build_failures_propagate() {
        let err = audit(&reference(), &json!({}), &Vocabulary::default(), &AuditConfig::default()).unwrap_err();
        assert!(matches!(err, MedkgError::Build(BuildError::InvalidPrediction(_))));
    }
}

//! Runs the stages in order and fills the bundle.

use crate::bundle::{AnalysisResultBundle, Stage};
use crate::{counterfactual, explain, metrics, reasoning, semantic, structural, visualize};
use medkg_core::prelude::*;
use tracing::{debug, info};

/// Runs analyses under one configuration.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AuditConfig,
}

impl Analyzer {
    pub fn new(config: AuditConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Run every stage.
    pub fn analyze(&self, pair: &KnowledgeGraphPair) -> AnalysisResultBundle {
        self.run_until(pair, Stage::Visualization)
    }

    /// Run stages in order up to and including `last`.
    pub fn run_until(&self, pair: &KnowledgeGraphPair, last: Stage) -> AnalysisResultBundle {
        let mut bundle = AnalysisResultBundle {
            predicted_disease: pair.predicted_disease().ok().map(str::to_string),
            ..Default::default()
        };
        info!(
            disease = bundle.predicted_disease.as_deref().unwrap_or("<none>"),
            through = %last,
            "starting analysis"
        );

        for stage in Stage::ALL.into_iter().take_while(|s| *s <= last) {
            self.run_stage(pair, stage, &mut bundle);
            bundle.completed_stages.push(stage);
            debug!(%stage, "stage complete");
        }

        info!(
            stages = bundle.completed_stages.len(),
            confidence = bundle.metrics.confidence_score,
            reliability = %bundle.metrics.reliability,
            "analysis finished"
        );
        bundle
    }

    fn run_stage(&self, pair: &KnowledgeGraphPair, stage: Stage, bundle: &mut AnalysisResultBundle) {
        let config = &self.config;
        match stage {
            Stage::Structural => bundle.structural_comparison = structural::compare(pair),
            Stage::Semantic => bundle.semantic_comparison = semantic::compare(pair),
            Stage::Reasoning => {
                bundle.reasoning_paths = reasoning::validate_with(pair, &config.validation)
            }
            Stage::Counterfactual => {
                bundle.counterfactuals = counterfactual::generate(pair, &config.counterfactual)
            }
            Stage::Metrics => {
                bundle.metrics = metrics::calculate(
                    pair,
                    &bundle.reasoning_paths,
                    &bundle.semantic_comparison,
                    &config.scoring,
                )
            }
            Stage::Explanations => {
                bundle.explanations = explain::generate(
                    pair,
                    &bundle.reasoning_paths,
                    &bundle.counterfactuals,
                    &config.explanation,
                )
            }
            Stage::Visualization => {
                bundle.visualization_data = Some(visualize::assemble(
                    pair,
                    &bundle.metrics,
                    &bundle.explanations,
                    &bundle.counterfactuals,
                ))
            }
        }
    }
}

/// Analyze a pair with the default configuration.
pub fn analyze(pair: &KnowledgeGraphPair) -> AnalysisResultBundle {
    Analyzer::default().analyze(pair)
}

/// Analyze a pair with an explicit configuration.
pub fn analyze_with(pair: &KnowledgeGraphPair, config: &AuditConfig) -> AnalysisResultBundle {
    Analyzer::new(config.clone()).analyze(pair)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pair() -> KnowledgeGraphPair {
        load(
            &json!({
                "nodes": [
                    {"id": "Flu", "type": "Disease"},
                    {"id": "Cold", "type": "Disease"},
                    {"id": "Fever", "type": "Symptom"},
                    {"id": "Cough", "type": "Symptom"}
                ],
                "links": [
                    {"source": "Flu", "target": "Fever", "relationship": "HAS_SYMPTOM", "weight": 0.9},
                    {"source": "Flu", "target": "Cough", "relationship": "HAS_SYMPTOM", "weight": 0.6},
                    {"source": "Cold", "target": "Cough", "relationship": "HAS_SYMPTOM", "weight": 0.8}
                ]
            }),
            &json!({
                "nodes": [{"id": "Flu", "type": "Disease"}, {"id": "Fever", "type": "Symptom"}],
                "links": [{"source": "Flu", "target": "Fever", "relationship": "HAS_SYMPTOM"}]
            }),
        )
        .unwrap()
    }

    #[test]
    fn full_run_completes_every_stage() {
        let bundle = analyze(&pair());
        assert!(bundle.is_complete());
        assert_eq!(bundle.predicted_disease.as_deref(), Some("Flu"));
        assert_eq!(bundle.reasoning_paths.reasoning_accuracy, 1.0);
        assert_eq!(bundle.reasoning_paths.missing_important_factors.len(), 1);
        assert!(bundle.visualization_data.is_some());
        assert!(bundle.explanations.summary.contains("ALTERNATIVE DIAGNOSIS:\nTo change the diagnosis from Flu to Cold"));
    }

    #[test]
    fn partial_run_leaves_later_sections_empty() {
        let bundle = Analyzer::default().run_until(&pair(), Stage::Reasoning);
        assert_eq!(
            bundle.completed_stages,
            vec![Stage::Structural, Stage::Semantic, Stage::Reasoning]
        );
        assert!(bundle.has_run(Stage::Reasoning));
        assert!(!bundle.has_run(Stage::Metrics));
        assert!(bundle.counterfactuals.alternative_diagnoses.is_empty());
        assert!(bundle.visualization_data.is_none());
    }

    #[test]
    fn configuration_changes_thresholds() {
        let mut config = AuditConfig::default();
        config.validation.important_factor_weight = 0.7;
        let bundle = analyze_with(&pair(), &config);
        assert!(bundle.reasoning_paths.missing_important_factors.is_empty());
    }
}

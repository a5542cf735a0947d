//! The analysis result bundle.
//!
//! One section per stage. A stage writes only its own section, and
//! `completed_stages` records which sections hold real output, so a bundle
//! from a partial run can be inspected as-is.

use crate::counterfactual::Counterfactuals;
use crate::explain::Explanations;
use crate::metrics::Metrics;
use crate::reasoning::ReasoningPaths;
use crate::semantic::SemanticComparison;
use crate::structural::StructuralComparison;
use crate::visualize::VisualizationData;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pipeline stages in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Structural,
    Semantic,
    Reasoning,
    Counterfactual,
    Metrics,
    Explanations,
    Visualization,
}

impl Stage {
    pub const ALL: [Stage; 7] = [
        Stage::Structural,
        Stage::Semantic,
        Stage::Reasoning,
        Stage::Counterfactual,
        Stage::Metrics,
        Stage::Explanations,
        Stage::Visualization,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Structural => "structural",
            Stage::Semantic => "semantic",
            Stage::Reasoning => "reasoning",
            Stage::Counterfactual => "counterfactual",
            Stage::Metrics => "metrics",
            Stage::Explanations => "explanations",
            Stage::Visualization => "visualization",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything one analysis produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResultBundle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted_disease: Option<String>,
    pub completed_stages: Vec<Stage>,
    pub structural_comparison: StructuralComparison,
    pub semantic_comparison: SemanticComparison,
    pub reasoning_paths: ReasoningPaths,
    pub counterfactuals: Counterfactuals,
    pub metrics: Metrics,
    pub explanations: Explanations,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visualization_data: Option<VisualizationData>,
}

impl AnalysisResultBundle {
    pub fn has_run(&self, stage: Stage) -> bool {
        self.completed_stages.contains(&stage)
    }

    /// Whether every stage ran.
    pub fn is_complete(&self) -> bool {
        Stage::ALL.iter().all(|s| self.has_run(*s))
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_are_ordered() {
        let mut sorted = Stage::ALL;
        sorted.sort();
        assert_eq!(sorted, Stage::ALL);
        assert_eq!(Stage::Counterfactual.to_string(), "counterfactual");
    }

    #[test]
    fn empty_bundle_is_incomplete() {
        let bundle = AnalysisResultBundle::default();
        assert!(!bundle.is_complete());
        assert!(!bundle.has_run(Stage::Structural));

        let json = bundle.to_json_pretty().unwrap();
        assert!(!json.contains("visualization_data"));
        let back = AnalysisResultBundle::from_json_str(&json).unwrap();
        assert_eq!(back, bundle);
    }
}

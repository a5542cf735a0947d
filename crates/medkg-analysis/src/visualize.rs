//! Merged, provenance-tagged graph for rendering.
//!
//! Reference nodes and links come first, tagged `ground_truth`. Prediction
//! nodes already present upgrade the entry to `both`; new ones are appended.
//! Prediction links are appended after all reference links, tagged `both`
//! when the reference holds the same triple.

use crate::counterfactual::{AlternativeDiagnosis, Counterfactuals, MinimalChanges};
use crate::explain::{Explanations, FactorExplanation, MissingFactorExplanation};
use crate::metrics::{Metrics, Reliability};
use medkg_core::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Which graph(s) a merged element came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    GroundTruth,
    Prediction,
    Both,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VizNode {
    #[serde(flatten)]
    pub node: Node,
    pub source: Provenance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VizLink {
    pub source: String,
    pub target: String,
    pub relationship: Relationship,
    pub weight: f64,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_novel: bool,
    pub source_graph: Provenance,
    /// Reference weight of a link both graphs hold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ground_truth_weight: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombinedGraph {
    pub nodes: Vec<VizNode>,
    pub links: Vec<VizLink>,
}

impl CombinedGraph {
    pub fn node(&self, id: &str) -> Option<&VizNode> {
        self.nodes.iter().find(|n| n.node.id == id)
    }
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentData {
    pub predicted_disease: Option<String>,
    /// Assessment label, `UNKNOWN` when none was made.
    pub assessment: String,
    pub confidence_score: f64,
    pub reasoning_accuracy: f64,
    pub semantic_similarity: f64,
    pub factor_coverage: f64,
    pub novelty: f64,
    pub reliability: Reliability,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExplanationData {
    pub valid_reasoning: Vec<FactorExplanation>,
    pub invalid_reasoning: Vec<FactorExplanation>,
    pub novel_reasoning: Vec<FactorExplanation>,
    pub missing_factors: Vec<MissingFactorExplanation>,
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CounterfactualData {
    pub alternatives: Vec<AlternativeDiagnosis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimal_changes: Option<MinimalChanges>,
}

/// Output of the visualization stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualizationData {
    pub combined_graph: CombinedGraph,
    pub assessment: AssessmentData,
    pub explanations: ExplanationData,
    pub counterfactuals: CounterfactualData,
}

/// Merge both graphs into one provenance-tagged graph.
pub fn combine(pair: &KnowledgeGraphPair) -> CombinedGraph {
    let mut nodes: Vec<VizNode> = Vec::with_capacity(pair.ground_truth.node_count());
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for node in pair.ground_truth.nodes() {
        positions.insert(node.id.as_str(), nodes.len());
        nodes.push(VizNode {
            node: node.clone(),
            source: Provenance::GroundTruth,
        });
    }
    for node in pair.prediction.nodes() {
        let existing = positions.get(node.id.as_str()).copied();
        match existing {
            Some(position) => nodes[position].source = Provenance::Both,
            None => {
                positions.insert(node.id.as_str(), nodes.len());
                nodes.push(VizNode {
                    node: node.clone(),
                    source: Provenance::Prediction,
                });
            }
        }
    }

    let resolved = |link: &Link| {
        positions.contains_key(link.source.as_str()) && positions.contains_key(link.target.as_str())
    };

    let mut links = Vec::with_capacity(pair.ground_truth.link_count() + pair.prediction.link_count());
    for link in pair.ground_truth.links().filter(|l| resolved(l)) {
        links.push(VizLink {
            source: link.source.clone(),
            target: link.target.clone(),
            relationship: link.relationship,
            weight: link.weight,
            is_novel: link.is_novel,
            source_graph: Provenance::GroundTruth,
            ground_truth_weight: None,
        });
    }
    for link in pair.prediction.links().filter(|l| resolved(l)) {
        let shared = pair
            .ground_truth
            .find_link(&link.source, &link.target, link.relationship);
        links.push(VizLink {
            source: link.source.clone(),
            target: link.target.clone(),
            relationship: link.relationship,
            weight: link.weight,
            is_novel: shared.is_none() && link.is_novel,
            source_graph: if shared.is_some() {
                Provenance::Both
            } else {
                Provenance::Prediction
            },
            ground_truth_weight: shared.map(|gt| gt.weight),
        });
    }

    debug!(nodes = nodes.len(), links = links.len(), "combined graphs");
    CombinedGraph { nodes, links }
}

/// Package the merged graph with the flattened result sections.
pub fn assemble(
    pair: &KnowledgeGraphPair,
    metrics: &Metrics,
    explanations: &Explanations,
    counterfactuals: &Counterfactuals,
) -> VisualizationData {
    let assessment = AssessmentData {
        predicted_disease: pair.predicted_disease().ok().map(str::to_string),
        assessment: explanations
            .assessment
            .map(|a| a.as_str().to_string())
            .unwrap_or_else(|| "UNKNOWN".to_string()),
        confidence_score: metrics.confidence_score,
        reasoning_accuracy: metrics.reasoning_accuracy,
        semantic_similarity: metrics.semantic_similarity,
        factor_coverage: metrics.factor_coverage,
        novelty: metrics.combined_novelty,
        reliability: metrics.reliability,
    };

    VisualizationData {
        combined_graph: combine(pair),
        assessment,
        explanations: ExplanationData {
            valid_reasoning: explanations.valid_reasoning.clone(),
            invalid_reasoning: explanations.invalid_reasoning.clone(),
            novel_reasoning: explanations.novel_reasoning.clone(),
            missing_factors: explanations.missing_factors.clone(),
            summary: explanations.summary.clone(),
        },
        counterfactuals: CounterfactualData {
            alternatives: counterfactuals.alternative_diagnoses.clone(),
            minimal_changes: counterfactuals.minimal_changes_explanation.clone(),
        },
    }
}

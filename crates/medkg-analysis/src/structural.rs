//! Structural comparison - coarse histograms of both graphs.
//!
//! Counts nodes per type and links per relationship in each graph and lists
//! the disease ids the two graphs share. Nothing here looks at individual
//! edges; that is the semantic comparator's job.

use medkg_core::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Per-graph counts keyed by some category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram<K: Ord> {
    pub ground_truth: BTreeMap<K, usize>,
    pub prediction: BTreeMap<K, usize>,
}

impl<K: Ord> Default for Histogram<K> {
    fn default() -> Self {
        Self {
            ground_truth: BTreeMap::new(),
            prediction: BTreeMap::new(),
        }
    }
}

/// Output of the structural stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuralComparison {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub node_types: Histogram<NodeType>,
    pub relationship_types: Histogram<Relationship>,
    pub shared_diseases: Vec<String>,
}

impl StructuralComparison {
    /// Result for a pair without a predicted disease: empty counts.
    pub fn unavailable(error: &NoPredictionError) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Default::default()
        }
    }
}

/// Compare the shape of both graphs.
pub fn compare(pair: &KnowledgeGraphPair) -> StructuralComparison {
    if let Err(e) = pair.predicted_disease() {
        return StructuralComparison::unavailable(&e);
    }

    let ground_truth = &pair.ground_truth;
    let prediction = &pair.prediction;

    let gt_diseases: BTreeSet<&str> = ground_truth.diseases().map(|n| n.id.as_str()).collect();
    let shared_diseases = prediction
        .diseases()
        .map(|n| n.id.as_str())
        .filter(|id| gt_diseases.contains(id))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();

    StructuralComparison {
        error: None,
        node_types: Histogram {
            ground_truth: count_node_types(ground_truth),
            prediction: count_node_types(prediction),
        },
        relationship_types: Histogram {
            ground_truth: count_relationships(ground_truth),
            prediction: count_relationships(prediction),
        },
        shared_diseases,
    }
}

fn count_node_types(graph: &KnowledgeGraph) -> BTreeMap<NodeType, usize> {
    let mut counts = BTreeMap::new();
    for node in graph.nodes() {
        *counts.entry(node.node_type).or_insert(0) += 1;
    }
    counts
}

fn count_relationships(graph: &KnowledgeGraph) -> BTreeMap<Relationship, usize> {
    let mut counts = BTreeMap::new();
    for link in graph.links() {
        *counts.entry(link.relationship).or_insert(0) += 1;
    }
    counts
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
                    {"id": "Asthma", "type": "Disease"},
                    {"id": "Fever", "type": "Symptom"},
                    {"id": "Cough", "type": "Symptom"},
                    {"id": "Male Gender", "type": "Gender"}
                ],
                "links": [
                    {"source": "Flu", "target": "Fever", "relationship": "HAS_SYMPTOM", "weight": 0.9},
                    {"source": "Asthma", "target": "Cough", "relationship": "HAS_SYMPTOM", "weight": 0.7},
                    {"source": "Flu", "target": "Male Gender", "relationship": "PREVALENT_IN", "weight": 0.5}
                ]
            }),
            &json!({
                "nodes": [
                    {"id": "Flu", "type": "Disease"},
                    {"id": "Fever", "type": "Symptom"}
                ],
                "links": [
                    {"source": "Flu", "target": "Fever", "relationship": "DOES_NOT_HAVE_SYMPTOM", "weight": 1.0}
                ]
            }),
        )
        .unwrap()
    }

    #[test]
    fn counts_types_and_relationships() {
        let result = compare(&pair());
        assert!(result.error.is_none());
        assert_eq!(result.node_types.ground_truth[&NodeType::Disease], 2);
        assert_eq!(result.node_types.ground_truth[&NodeType::Symptom], 2);
        assert_eq!(result.node_types.prediction[&NodeType::Symptom], 1);
        assert_eq!(result.relationship_types.ground_truth[&Relationship::HasSymptom], 2);
        assert_eq!(
            result.relationship_types.prediction[&Relationship::DoesNotHaveSymptom],
            1
        );
        assert_eq!(result.shared_diseases, vec!["Flu".to_string()]);
    }

    #[test]
    fn serializes_with_document_keys() {
        let value = serde_json::to_value(compare(&pair())).unwrap();
        assert_eq!(value["node_types"]["ground_truth"]["Gender"], 1);
        assert_eq!(value["relationship_types"]["ground_truth"]["PREVALENT_IN"], 1);
        assert!(value.get("error").is_none());
    }

    #[test]
    fn no_prediction_yields_empty_result() {
        let pair = load(
            &json!({"nodes": [{"id": "Flu", "type": "Disease"}], "links": []}),
            &json!({"nodes": [], "links": []}),
        )
        .unwrap();
        let result = compare(&pair);
        assert_eq!(result.error.as_deref(), Some("No predicted disease found"));
        assert!(result.node_types.ground_truth.is_empty());
        assert!(result.shared_diseases.is_empty());
    }
}

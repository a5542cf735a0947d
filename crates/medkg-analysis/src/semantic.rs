//! Semantic comparison - the predicted disease's links, relationship by relationship.
//!
//! For each relationship type used by either graph, the targets the predicted
//! disease reaches are split into matches, ground-truth-only and
//! prediction-only sets. The overall similarity is the share of reference
//! targets the prediction reproduced.

use medkg_core::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// The split of targets for one relationship type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationshipComparison {
    pub matches: Vec<String>,
    pub ground_truth_only: Vec<String>,
    pub prediction_only: Vec<String>,
    /// Prediction-only targets reached through a novel link.
    pub novel_factors: Vec<String>,
    pub match_ratio: f64,
}

/// A prediction factor flagged as novel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NovelFactor {
    pub factor: String,
    pub relationship: Relationship,
    pub factor_type: NodeType,
}

/// Output of the semantic stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SemanticComparison {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub disease_match: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    pub relationship_comparison: BTreeMap<Relationship, RelationshipComparison>,
    pub novel_factors: Vec<NovelFactor>,
    pub overall_similarity: f64,
}

impl SemanticComparison {
    pub fn unavailable(error: &NoPredictionError) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Default::default()
        }
    }
}

/// Compare the predicted disease's outgoing links across both graphs.
pub fn compare(pair: &KnowledgeGraphPair) -> SemanticComparison {
    let disease = match pair.predicted_disease() {
        Ok(d) => d,
        Err(e) => return SemanticComparison::unavailable(&e),
    };

    if !pair.ground_truth.contains(disease) {
        warn!(disease, "predicted disease is absent from the ground truth graph");
        return SemanticComparison {
            disease_match: false,
            explanation: Some(format!(
                "The predicted disease '{}' does not exist in the ground truth knowledge graph.",
                disease
            )),
            ..Default::default()
        };
    }

    let gt_links = group_targets(pair.ground_truth.outgoing(disease));
    let pred_out = pair.prediction.outgoing(disease);
    let pred_links = group_targets(pred_out.iter().copied());

    let novel_links: Vec<&Link> = pred_out
        .iter()
        .copied()
        .filter(|link| pair.prediction.is_novel_link(link))
        .collect();

    let novel_factors = novel_links
        .iter()
        .map(|link| NovelFactor {
            factor: link.target.clone(),
            relationship: link.relationship,
            factor_type: pair.prediction.target_type(link),
        })
        .collect();

    let relationships: BTreeSet<Relationship> =
        gt_links.keys().chain(pred_links.keys()).copied().collect();

    let empty = BTreeSet::new();
    let mut relationship_comparison = BTreeMap::new();
    for rel in relationships {
        let gt = gt_links.get(&rel).unwrap_or(&empty);
        let pred = pred_links.get(&rel).unwrap_or(&empty);

        let matches: Vec<String> = gt.intersection(pred).map(|s| s.to_string()).collect();
        let ground_truth_only: Vec<String> = gt.difference(pred).map(|s| s.to_string()).collect();
        let prediction_only: Vec<String> = pred.difference(gt).map(|s| s.to_string()).collect();

        let novel: Vec<String> = novel_links
            .iter()
            .filter(|link| link.relationship == rel && !gt.contains(link.target.as_str()))
            .map(|link| link.target.clone())
            .collect();

        let match_ratio = matches.len() as f64 / gt.len().max(1) as f64;

        relationship_comparison.insert(
            rel,
            RelationshipComparison {
                matches,
                ground_truth_only,
                prediction_only,
                novel_factors: novel,
                match_ratio,
            },
        );
    }

    let overall_similarity = overall_similarity(&relationship_comparison);

    SemanticComparison {
        error: None,
        disease_match: true,
        explanation: None,
        relationship_comparison,
        novel_factors,
        overall_similarity,
    }
}

/// Σ matches / Σ (matches + ground-truth-only), or 0 with nothing to match.
pub fn overall_similarity(comparison: &BTreeMap<Relationship, RelationshipComparison>) -> f64 {
    let matched: usize = comparison.values().map(|c| c.matches.len()).sum();
    let expected: usize = comparison
        .values()
        .map(|c| c.matches.len() + c.ground_truth_only.len())
        .sum();
    if expected == 0 {
        0.0
    } else {
        matched as f64 / expected as f64
    }
}

fn group_targets<'a>(
    links: impl IntoIterator<Item = &'a Link>,
) -> BTreeMap<Relationship, BTreeSet<&'a str>> {
    let mut groups: BTreeMap<Relationship, BTreeSet<&str>> = BTreeMap::new();
    for link in links {
        groups
            .entry(link.relationship)
            .or_default()
            .insert(link.target.as_str());
    }
    groups
}

//! Scores and the reliability verdict.
//!
//! Aggregates the reasoning and semantic stages with two set measures taken
//! directly from the graphs: how many heavy reference factors the prediction
//! covers, and how much of the prediction is new.

use crate::reasoning::ReasoningPaths;
use crate::semantic::SemanticComparison;
use medkg_core::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// Categorical verdict on the confidence score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Reliability {
    High,
    Medium,
    #[default]
    Low,
}

impl Reliability {
    pub fn from_score(score: f64, config: &ScoringConfig) -> Self {
        if score >= config.high_reliability {
            Reliability::High
        } else if score >= config.medium_reliability {
            Reliability::Medium
        } else {
            Reliability::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Reliability::High => "HIGH",
            Reliability::Medium => "MEDIUM",
            Reliability::Low => "LOW",
        }
    }
}

impl fmt::Display for Reliability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of the metrics stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub reasoning_accuracy: f64,
    pub semantic_similarity: f64,
    /// Share of heavy reference factors the prediction mentions.
    pub factor_coverage: f64,
    /// Share of prediction factors outside the heavy reference factors.
    pub novelty: f64,
    /// Share of prediction factors flagged novel.
    pub explicit_novelty: f64,
    pub combined_novelty: f64,
    pub confidence_score: f64,
    pub reliability: Reliability,
}

impl Metrics {
    pub fn unavailable(error: &NoPredictionError) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Default::default()
        }
    }
}

/// Compute every metric for one analysis.
pub fn calculate(
    pair: &KnowledgeGraphPair,
    reasoning: &ReasoningPaths,
    semantic: &SemanticComparison,
    config: &ScoringConfig,
) -> Metrics {
    let disease = match pair.predicted_disease() {
        Ok(d) => d,
        Err(e) => return Metrics::unavailable(&e),
    };

    let heavy_reference: HashSet<&str> = pair
        .ground_truth
        .outgoing(disease)
        .into_iter()
        .filter(|link| link.weight > config.coverage_weight)
        .map(|link| link.target.as_str())
        .collect();

    let prediction_links = pair.prediction.outgoing(disease);
    let predicted: HashSet<&str> = prediction_links.iter().map(|l| l.target.as_str()).collect();
    let flagged: HashSet<&str> = prediction_links
        .iter()
        .filter(|l| pair.prediction.is_novel_link(l))
        .map(|l| l.target.as_str())
        .collect();

    let factor_coverage = fraction(
        heavy_reference.intersection(&predicted).count(),
        heavy_reference.len(),
    );
    let novelty = fraction(predicted.difference(&heavy_reference).count(), predicted.len());
    let explicit_novelty = fraction(flagged.len(), predicted.len());
    let combined_novelty = if explicit_novelty > 0.0 {
        explicit_novelty
    } else {
        novelty
    };

    let reasoning_accuracy = reasoning.reasoning_accuracy;
    let semantic_similarity = semantic.overall_similarity;
    let confidence_score = reasoning_accuracy * config.accuracy_share
        + semantic_similarity * config.similarity_share
        + factor_coverage * config.coverage_share;
    let reliability = Reliability::from_score(confidence_score, config);

    debug!(confidence_score, %reliability, "calculated metrics");

    Metrics {
        error: None,
        reasoning_accuracy,
        semantic_similarity,
        factor_coverage,
        novelty,
        explicit_novelty,
        combined_novelty,
        confidence_score,
        reliability,
    }
}

fn fraction(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

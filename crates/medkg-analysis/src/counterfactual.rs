//! Counterfactual Diagnosis Engine.
//!
//! Answers "what would have to change for a different diagnosis?":
//!
//! 1. Take the factor set the prediction attaches to the predicted disease
//! 2. Rank every other reference disease by Jaccard similarity of factor sets
//! 3. For the closest few, list the factors to add and the factors to remove
//! 4. Render the closest alternative's edit set as a paragraph
//!
//! # Example
//!
//! ```rust,ignore
//! use medkg_analysis::counterfactual::*;
//!
//! let result = generate(&pair, &CounterfactualConfig::default());
//! if let Some(top) = &result.minimal_changes_explanation {
//!     println!("{}", top.explanation);
//! }
//! ```

use medkg_core::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Direction of a single factor edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    Add,
    Remove,
}

/// One factor that would have to appear or disappear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorChange {
    pub action: ChangeAction,
    pub factor: String,
    pub factor_type: NodeType,
    pub relationship: Relationship,
}

/// A reference disease close to the predicted one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeDiagnosis {
    pub alternative_disease: String,
    /// Jaccard similarity of the two factor sets.
    pub similarity: f64,
    pub shared_factors: Vec<String>,
    /// Additions first, then removals.
    pub changes_needed: Vec<FactorChange>,
}

impl AlternativeDiagnosis {
    pub fn additions(&self) -> impl Iterator<Item = &FactorChange> {
        self.changes_needed.iter().filter(|c| c.action == ChangeAction::Add)
    }

    pub fn removals(&self) -> impl Iterator<Item = &FactorChange> {
        self.changes_needed.iter().filter(|c| c.action == ChangeAction::Remove)
    }
}

/// The edit set of the closest alternative, rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinimalChanges {
    pub alternative_disease: String,
    pub changes: Vec<FactorChange>,
    pub explanation: String,
}

/// Output of the counterfactual stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Counterfactuals {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub alternative_diagnoses: Vec<AlternativeDiagnosis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimal_changes_explanation: Option<MinimalChanges>,
}

impl Counterfactuals {
    pub fn unavailable(error: &NoPredictionError) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Default::default()
        }
    }
}

/// Find the closest alternative diagnoses and what separates them from the prediction.
pub fn generate(pair: &KnowledgeGraphPair, config: &CounterfactualConfig) -> Counterfactuals {
    let disease = match pair.predicted_disease() {
        Ok(d) => d,
        Err(e) => return Counterfactuals::unavailable(&e),
    };

    let predicted = pair.prediction.factors(disease);
    let predicted_set: HashSet<&str> = predicted.iter().copied().collect();

    let mut candidates = Vec::new();
    for candidate in pair.ground_truth.diseases() {
        if candidate.id == disease {
            continue;
        }
        let factors = pair.ground_truth.factors(&candidate.id);
        let factor_set: HashSet<&str> = factors.iter().copied().collect();

        let union = predicted_set.union(&factor_set).count();
        if union == 0 {
            continue;
        }
        let shared_factors: Vec<String> = predicted
            .iter()
            .filter(|f| factor_set.contains(*f))
            .map(|f| f.to_string())
            .collect();
        let similarity = shared_factors.len() as f64 / union as f64;

        candidates.push(AlternativeDiagnosis {
            alternative_disease: candidate.id.clone(),
            similarity,
            shared_factors,
            changes_needed: changes_needed(pair, disease, &candidate.id, &predicted_set, &factor_set),
        });
    }

    // Stable: equal similarities keep reference disease order.
    candidates.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    candidates.truncate(config.max_alternatives);

    let minimal_changes_explanation = candidates.first().map(|top| MinimalChanges {
        alternative_disease: top.alternative_disease.clone(),
        changes: top.changes_needed.clone(),
        explanation: change_explanation(disease, top),
    });

    debug!(
        alternatives = candidates.len(),
        top = minimal_changes_explanation
            .as_ref()
            .map(|m| m.alternative_disease.as_str())
            .unwrap_or("none"),
        "generated counterfactuals"
    );

    Counterfactuals {
        error: None,
        alternative_diagnoses: candidates,
        minimal_changes_explanation,
    }
}

/// Additions in reference link order, then removals in prediction link order.
fn changes_needed(
    pair: &KnowledgeGraphPair,
    disease: &str,
    candidate: &str,
    predicted: &HashSet<&str>,
    candidate_factors: &HashSet<&str>,
) -> Vec<FactorChange> {
    let additions = edits(
        &pair.ground_truth,
        candidate,
        |factor| !predicted.contains(factor),
        ChangeAction::Add,
    );
    let removals = edits(
        &pair.prediction,
        disease,
        |factor| !candidate_factors.contains(factor),
        ChangeAction::Remove,
    );
    additions.into_iter().chain(removals).collect()
}

fn edits(
    graph: &KnowledgeGraph,
    disease: &str,
    wanted: impl Fn(&str) -> bool,
    action: ChangeAction,
) -> Vec<FactorChange> {
    let mut seen = HashSet::new();
    graph
        .outgoing(disease)
        .into_iter()
        .filter(|link| wanted(&link.target) && seen.insert(link.target.as_str()))
        .filter_map(|link| {
            // A factor whose node cannot be resolved is left out of the edit set.
            let node = graph.node(&link.target)?;
            Some(FactorChange {
                action,
                factor: link.target.clone(),
                factor_type: node.node_type,
                relationship: link.relationship,
            })
        })
        .collect()
}

/// Render an alternative's edit set as a paragraph.
pub fn change_explanation(predicted_disease: &str, alternative: &AlternativeDiagnosis) -> String {
    let mut text = format!(
        "To change the diagnosis from {} to {}, the following changes would be needed:\n\n",
        predicted_disease, alternative.alternative_disease
    );

    let mut additions = alternative.additions().peekable();
    if additions.peek().is_some() {
        text.push_str("Additions:\n");
        for change in additions {
            text.push_str(&format!(
                "- Add {} ({}): The patient would need to {} this factor.\n",
                change.factor,
                change.factor_type,
                change.relationship.phrase()
            ));
        }
    }

    let mut removals = alternative.removals().peekable();
    if removals.peek().is_some() {
        text.push_str("\nRemovals:\n");
        for change in removals {
            text.push_str(&format!(
                "- Remove {} ({}): The patient would need to no longer {} this factor.\n",
                change.factor,
                change.factor_type,
                change.relationship.phrase()
            ));
        }
    }

    text
}

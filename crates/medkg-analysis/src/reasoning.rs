//! Reasoning path validation.
//!
//! Every link the prediction draws from the predicted disease is checked
//! against the reference graph and recorded once in a [`ReasoningLedger`],
//! keyed by `(factor, relationship)`. A second pass over the reference links
//! records heavy factors the prediction never mentions and annotates factors
//! it linked under the wrong relationship.

use medkg_core::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

const NOVEL_NOTE: &str = "This is a novel factor not present in the ground truth knowledge graph.";

/// Another reference disease carrying the same `(relationship, factor)` link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeDisease {
    pub disease: String,
    pub weight: f64,
}

/// One prediction link and the verdict on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningItem {
    pub factor: String,
    pub factor_type: NodeType,
    pub relationship: Relationship,
    /// Set when the reference links this factor under another relationship.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_relationship: Option<Relationship>,
    pub evidence: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternative_diseases: Vec<AlternativeDisease>,
}

impl ReasoningItem {
    fn new(link: &Link, factor_type: NodeType, evidence: impl Into<String>) -> Self {
        Self {
            factor: link.target.clone(),
            factor_type,
            relationship: link.relationship,
            expected_relationship: None,
            evidence: evidence.into(),
            alternative_diseases: Vec::new(),
        }
    }
}

/// A heavy reference factor the prediction does not mention at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingFactor {
    pub factor: String,
    pub factor_type: NodeType,
    pub relationship: Relationship,
    pub weight: f64,
    pub is_key_symptom: bool,
}

/// A typed verdict on one `(factor, relationship)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "finding", rename_all = "snake_case")]
pub enum Finding {
    Valid(ReasoningItem),
    Invalid(ReasoningItem),
    Novel(ReasoningItem),
    Missing(MissingFactor),
}

impl Finding {
    pub fn key(&self) -> (&str, Relationship) {
        match self {
            Finding::Valid(item) | Finding::Invalid(item) | Finding::Novel(item) => {
                (item.factor.as_str(), item.relationship)
            }
            Finding::Missing(missing) => (missing.factor.as_str(), missing.relationship),
        }
    }
}

/// Findings in the order they were recorded, indexed by key.
#[derive(Debug, Clone, Default)]
pub struct ReasoningLedger {
    findings: Vec<Finding>,
    index: HashMap<(String, Relationship), usize>,
}

impl ReasoningLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finding. Returns false, leaving the ledger unchanged, when
    /// its key was already recorded.
    pub fn record(&mut self, finding: Finding) -> bool {
        let (factor, relationship) = finding.key();
        let key = (factor.to_string(), relationship);
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key, self.findings.len());
        self.findings.push(finding);
        true
    }

    pub fn contains(&self, factor: &str, relationship: Relationship) -> bool {
        self.index.contains_key(&(factor.to_string(), relationship))
    }

    pub fn get_mut(&mut self, factor: &str, relationship: Relationship) -> Option<&mut Finding> {
        let position = *self.index.get(&(factor.to_string(), relationship))?;
        self.findings.get_mut(position)
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Split the ledger into per-verdict lists, keeping record order.
    pub fn into_paths(self) -> ReasoningPaths {
        let mut paths = ReasoningPaths::default();
        for finding in self.findings {
            match finding {
                Finding::Valid(item) => paths.valid_reasoning.push(item),
                Finding::Invalid(item) => paths.invalid_reasoning.push(item),
                Finding::Novel(item) => paths.novel_reasoning.push(item),
                Finding::Missing(missing) => paths.missing_important_factors.push(missing),
            }
        }
        paths.reasoning_accuracy = ratio(paths.valid_reasoning.len(), paths.evaluated());
        paths
    }
}

/// Output of the reasoning stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReasoningPaths {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub valid_reasoning: Vec<ReasoningItem>,
    pub invalid_reasoning: Vec<ReasoningItem>,
    pub novel_reasoning: Vec<ReasoningItem>,
    pub missing_important_factors: Vec<MissingFactor>,
    /// valid / (valid + invalid); novel factors do not count.
    pub reasoning_accuracy: f64,
}

impl ReasoningPaths {
    pub fn unavailable(error: &NoPredictionError) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Default::default()
        }
    }

    /// Number of items that took part in validity scoring.
    pub fn evaluated(&self) -> usize {
        self.valid_reasoning.len() + self.invalid_reasoning.len()
    }
}

/// Validate the prediction's reasoning with the default thresholds.
pub fn validate(pair: &KnowledgeGraphPair) -> ReasoningPaths {
    validate_with(pair, &ValidationConfig::default())
}

/// Validate the prediction's reasoning against the reference graph.
pub fn validate_with(pair: &KnowledgeGraphPair, config: &ValidationConfig) -> ReasoningPaths {
    let disease = match pair.predicted_disease() {
        Ok(d) => d,
        Err(e) => return ReasoningPaths::unavailable(&e),
    };

    let mut ledger = ReasoningLedger::new();
    check_prediction_links(pair, disease, config, &mut ledger);
    if pair.ground_truth.contains(disease) {
        check_reference_factors(pair, disease, config, &mut ledger);
    }

    let paths = ledger.into_paths();
    debug!(
        valid = paths.valid_reasoning.len(),
        invalid = paths.invalid_reasoning.len(),
        novel = paths.novel_reasoning.len(),
        missing = paths.missing_important_factors.len(),
        accuracy = paths.reasoning_accuracy,
        "validated reasoning paths"
    );
    paths
}

fn check_prediction_links(
    pair: &KnowledgeGraphPair,
    disease: &str,
    config: &ValidationConfig,
    ledger: &mut ReasoningLedger,
) {
    let ground_truth = &pair.ground_truth;

    for link in pair.prediction.outgoing(disease) {
        if ledger.contains(&link.target, link.relationship) {
            continue;
        }
        let factor_type = pair.prediction.target_type(link);

        if pair.prediction.is_novel_link(link) {
            ledger.record(Finding::Novel(ReasoningItem::new(link, factor_type, NOVEL_NOTE)));
            continue;
        }

        let finding = if link.relationship == Relationship::DoesNotHaveSymptom {
            match ground_truth.find_link(disease, &link.target, Relationship::HasSymptom) {
                Some(gt) if gt.weight > config.absence_contradiction_weight => {
                    Finding::Invalid(ReasoningItem::new(
                        link,
                        factor_type,
                        format!(
                            "Invalid absence - symptom is common in ground truth (weight: {})",
                            format_weight(gt.weight)
                        ),
                    ))
                }
                Some(gt) => Finding::Valid(ReasoningItem::new(
                    link,
                    factor_type,
                    format!(
                        "Valid absence - symptom is uncommon in ground truth (weight: {})",
                        format_weight(gt.weight)
                    ),
                )),
                None => Finding::Valid(ReasoningItem::new(
                    link,
                    factor_type,
                    "Valid absence - this symptom is not strongly associated with the disease in ground truth",
                )),
            }
        } else {
            match ground_truth.find_link(disease, &link.target, link.relationship) {
                Some(gt) => Finding::Valid(ReasoningItem::new(
                    link,
                    factor_type,
                    format!("Connection confirmed with weight {}", format_weight(gt.weight)),
                )),
                None => {
                    let mut item =
                        ReasoningItem::new(link, factor_type, "Connection not found in ground truth");
                    item.alternative_diseases =
                        alternative_diseases(ground_truth, disease, &link.target, link.relationship);
                    Finding::Invalid(item)
                }
            }
        };
        ledger.record(finding);
    }
}

fn check_reference_factors(
    pair: &KnowledgeGraphPair,
    disease: &str,
    config: &ValidationConfig,
    ledger: &mut ReasoningLedger,
) {
    for gt in pair.ground_truth.outgoing(disease) {
        if gt.weight <= config.important_factor_weight {
            continue;
        }

        let mentioned = pair.prediction.links_between(disease, &gt.target);
        if mentioned.is_empty() {
            ledger.record(Finding::Missing(MissingFactor {
                factor: gt.target.clone(),
                factor_type: pair.ground_truth.target_type(gt),
                relationship: gt.relationship,
                weight: gt.weight,
                is_key_symptom: config.is_key_symptom(&gt.target),
            }));
            continue;
        }

        if gt.weight <= config.wrong_relationship_weight {
            continue;
        }
        // Every mentioned link is already in the ledger; only invalid ones get annotated.
        for link in mentioned.into_iter().filter(|l| l.relationship != gt.relationship) {
            if let Some(Finding::Invalid(item)) = ledger.get_mut(&link.target, link.relationship) {
                if item.expected_relationship.is_none() {
                    item.expected_relationship = Some(gt.relationship);
                }
            }
        }
    }
}

/// Other reference diseases linked to `factor` by `relationship`, heaviest first.
fn alternative_diseases(
    ground_truth: &KnowledgeGraph,
    disease: &str,
    factor: &str,
    relationship: Relationship,
) -> Vec<AlternativeDisease> {
    let mut alternatives: Vec<AlternativeDisease> = ground_truth
        .diseases()
        .filter(|d| d.id != disease)
        .filter_map(|d| {
            ground_truth
                .find_link(&d.id, factor, relationship)
                .map(|link| AlternativeDisease {
                    disease: d.id.clone(),
                    weight: link.weight,
                })
        })
        .collect();
    alternatives.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    alternatives
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn ground_truth(fever_weight: f64) -> Value {
        json!({
            "nodes": [
                {"id": "Flu", "type": "Disease"},
                {"id": "Cold", "type": "Disease"},
                {"id": "Asthma", "type": "Disease"},
                {"id": "Fever", "type": "Symptom"},
                {"id": "Rash", "type": "Symptom"},
                {"id": "Sneezing", "type": "Symptom"},
                {"id": "Male Gender", "type": "Gender"}
            ],
            "links": [
                {"source": "Flu", "target": "Fever", "relationship": "HAS_SYMPTOM", "weight": fever_weight},
                {"source": "Flu", "target": "Male Gender", "relationship": "PREVALENT_IN", "weight": 0.6},
                {"source": "Cold", "target": "Sneezing", "relationship": "HAS_SYMPTOM", "weight": 0.5},
                {"source": "Asthma", "target": "Sneezing", "relationship": "HAS_SYMPTOM", "weight": 0.8}
            ]
        })
    }

    fn prediction(links: Value) -> Value {
        json!({
            "nodes": [
                {"id": "Flu", "type": "Disease"},
                {"id": "Fever", "type": "Symptom"},
                {"id": "Sneezing", "type": "Symptom"},
                {"id": "Tingling", "type": "Symptom", "is_novel": true},
                {"id": "Male Gender", "type": "Gender"}
            ],
            "links": links
        })
    }

    fn run(fever_weight: f64, links: Value) -> ReasoningPaths {
        let pair = load(&ground_truth(fever_weight), &prediction(links)).unwrap();
        validate(&pair)
    }

    #[test]
    fn contradicted_absence_is_invalid() {
        let paths = run(
            0.9,
            json!([{"source": "Flu", "target": "Fever", "relationship": "DOES_NOT_HAVE_SYMPTOM"}]),
        );
        assert_eq!(paths.invalid_reasoning.len(), 1);
        assert_eq!(
            paths.invalid_reasoning[0].evidence,
            "Invalid absence - symptom is common in ground truth (weight: 0.90)"
        );
        assert_eq!(
            paths.invalid_reasoning[0].expected_relationship,
            Some(Relationship::HasSymptom)
        );
        assert_eq!(paths.reasoning_accuracy, 0.0);
    }

    #[test]
    fn weak_or_absent_symptom_supports_absence() {
        let paths = run(
            0.2,
            json!([{"source": "Flu", "target": "Fever", "relationship": "DOES_NOT_HAVE_SYMPTOM"}]),
        );
        assert_eq!(paths.valid_reasoning.len(), 1);
        assert!(paths.valid_reasoning[0].evidence.contains("uncommon"));
        assert_eq!(paths.reasoning_accuracy, 1.0);

        let paths = run(
            0.2,
            json!([{"source": "Flu", "target": "Sneezing", "relationship": "DOES_NOT_HAVE_SYMPTOM"}]),
        );
        assert!(paths.valid_reasoning[0].evidence.contains("not strongly associated"));
    }

    #[test]
    fn novel_links_skip_scoring() {
        let paths = run(
            0.2,
            json!([
                {"source": "Flu", "target": "Male Gender", "relationship": "PREVALENT_IN"},
                {"source": "Flu", "target": "Tingling", "relationship": "HAS_SYMPTOM"}
            ]),
        );
        assert_eq!(paths.novel_reasoning.len(), 1);
        assert_eq!(paths.novel_reasoning[0].evidence, NOVEL_NOTE);
        assert_eq!(paths.evaluated(), 1);
        assert_eq!(paths.reasoning_accuracy, 1.0);
        assert_eq!(
            paths.valid_reasoning[0].evidence,
            "Connection confirmed with weight 0.60"
        );
    }

    #[test]
    fn wrong_relationship_names_the_expected_one() {
        let paths = run(
            0.2,
            json!([{"source": "Flu", "target": "Male Gender", "relationship": "COMMON_IN"}]),
        );
        assert_eq!(paths.invalid_reasoning.len(), 1);
        assert!(paths.missing_important_factors.is_empty());
        let item = &paths.invalid_reasoning[0];
        assert_eq!(item.relationship, Relationship::CommonIn);
        assert_eq!(item.expected_relationship, Some(Relationship::PrevalentIn));
        assert_eq!(item.evidence, "Connection not found in ground truth");
    }

    #[test]
    fn unsupported_links_list_alternatives() {
        let paths = run(
            0.2,
            json!([{"source": "Flu", "target": "Sneezing", "relationship": "HAS_SYMPTOM"}]),
        );
        let item = &paths.invalid_reasoning[0];
        let alternatives: Vec<_> = item.alternative_diseases.iter().map(|a| a.disease.as_str()).collect();
        assert_eq!(alternatives, vec!["Asthma", "Cold"]);
    }

    #[test]
    fn heavy_unmentioned_factors_are_missing() {
        let paths = run(
            0.9,
            json!([{"source": "Flu", "target": "Sneezing", "relationship": "HAS_SYMPTOM", "weight": 1.0}]),
        );
        let missing: Vec<_> = paths
            .missing_important_factors
            .iter()
            .map(|m| (m.factor.as_str(), m.is_key_symptom))
            .collect();
        assert_eq!(missing, vec![("Fever", true), ("Male Gender", false)]);
        // Missing factors do not move the accuracy.
        assert_eq!(paths.reasoning_accuracy, 0.0);
    }

    #[test]
    fn each_pair_lands_in_exactly_one_list() {
        let paths = run(
            0.9,
            json!([
                {"source": "Flu", "target": "Fever", "relationship": "HAS_SYMPTOM"},
                {"source": "Flu", "target": "Fever", "relationship": "DOES_NOT_HAVE_SYMPTOM"},
                {"source": "Flu", "target": "Tingling", "relationship": "HAS_SYMPTOM"},
                {"source": "Flu", "target": "Sneezing", "relationship": "HAS_SYMPTOM"}
            ]),
        );
        let mut keys: Vec<(String, Relationship)> = paths
            .valid_reasoning
            .iter()
            .chain(&paths.invalid_reasoning)
            .chain(&paths.novel_reasoning)
            .map(|i| (i.factor.clone(), i.relationship))
            .collect();
        assert_eq!(keys.len(), 4);
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 4);
        assert!((paths.reasoning_accuracy - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn ledger_ignores_repeated_keys() {
        let item = MissingFactor {
            factor: "Fever".into(),
            factor_type: NodeType::Symptom,
            relationship: Relationship::HasSymptom,
            weight: 0.9,
            is_key_symptom: true,
        };
        let mut ledger = ReasoningLedger::new();
        assert!(ledger.record(Finding::Missing(item.clone())));
        assert!(!ledger.record(Finding::Missing(item)));
        assert_eq!(ledger.len(), 1);
        assert!(ledger.contains("Fever", Relationship::HasSymptom));
    }

    #[test]
    fn findings_serialize_with_tag() {
        let finding = Finding::Missing(MissingFactor {
            factor: "Rash".into(),
            factor_type: NodeType::Symptom,
            relationship: Relationship::HasSymptom,
            weight: 0.45,
            is_key_symptom: false,
        });
        let value = serde_json::to_value(&finding).unwrap();
        assert_eq!(value["finding"], "missing");
        assert_eq!(value["factor"], "Rash");
    }

    #[test]
    fn no_prediction_is_reported() {
        let pair = load(&ground_truth(0.9), &json!({"nodes": [], "links": []})).unwrap();
        let paths = validate(&pair);
        assert!(paths.error.is_some());
        assert!(paths.valid_reasoning.is_empty());
    }
}

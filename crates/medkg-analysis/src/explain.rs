//! Template explanations of the reasoning findings.
//!
//! Every sentence is produced from fixed templates, so the same findings
//! always render to the same text.

use crate::counterfactual::Counterfactuals;
use crate::reasoning::{MissingFactor, ReasoningItem, ReasoningPaths};
use medkg_core::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Overall verdict on the prediction's reasoning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Assessment {
    #[serde(rename = "STRONG MATCH")]
    StrongMatch,
    #[serde(rename = "PARTIAL MATCH")]
    PartialMatch,
    #[serde(rename = "WEAK MATCH")]
    WeakMatch,
}

impl Assessment {
    /// Assessment from reasoning accuracy alone.
    pub fn from_accuracy(accuracy: f64, config: &ExplanationConfig) -> Self {
        if accuracy >= config.strong_match {
            Assessment::StrongMatch
        } else if accuracy >= config.partial_match {
            Assessment::PartialMatch
        } else {
            Assessment::WeakMatch
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Assessment::StrongMatch => "STRONG MATCH",
            Assessment::PartialMatch => "PARTIAL MATCH",
            Assessment::WeakMatch => "WEAK MATCH",
        }
    }
}

impl fmt::Display for Assessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorExplanation {
    pub factor: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingFactorExplanation {
    pub factor: String,
    pub explanation: String,
    pub is_key_symptom: bool,
    pub weight: f64,
    pub factor_type: NodeType,
}

/// Output of the explanation stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Explanations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessment: Option<Assessment>,
    pub assessment_explanation: String,
    pub valid_reasoning: Vec<FactorExplanation>,
    pub invalid_reasoning: Vec<FactorExplanation>,
    pub novel_reasoning: Vec<FactorExplanation>,
    /// Heaviest first, key symptoms before others of equal weight.
    pub missing_factors: Vec<MissingFactorExplanation>,
    pub summary: String,
}

impl Explanations {
    pub fn unavailable(error: &NoPredictionError) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Default::default()
        }
    }
}

/// Render explanations for a validated prediction.
pub fn generate(
    pair: &KnowledgeGraphPair,
    reasoning: &ReasoningPaths,
    counterfactuals: &Counterfactuals,
    config: &ExplanationConfig,
) -> Explanations {
    let disease = match pair.predicted_disease() {
        Ok(d) => d,
        Err(e) => return Explanations::unavailable(&e),
    };

    let assessment = Assessment::from_accuracy(reasoning.reasoning_accuracy, config);
    let assessment_explanation = assessment_text(assessment, reasoning);

    let valid_reasoning = reasoning
        .valid_reasoning
        .iter()
        .map(|item| explained(item, valid_text(disease, item)))
        .collect();
    let invalid_reasoning = reasoning
        .invalid_reasoning
        .iter()
        .map(|item| explained(item, invalid_text(disease, item)))
        .collect();
    let novel_reasoning = reasoning
        .novel_reasoning
        .iter()
        .map(|item| explained(item, novel_text(item)))
        .collect();

    let mut missing_factors: Vec<MissingFactorExplanation> = reasoning
        .missing_important_factors
        .iter()
        .map(|missing| MissingFactorExplanation {
            factor: missing.factor.clone(),
            explanation: missing_text(disease, missing, config),
            is_key_symptom: missing.is_key_symptom,
            weight: missing.weight,
            factor_type: missing.factor_type,
        })
        .collect();
    missing_factors.sort_by(missing_priority);

    let mut explanations = Explanations {
        error: None,
        assessment: Some(assessment),
        assessment_explanation,
        valid_reasoning,
        invalid_reasoning,
        novel_reasoning,
        missing_factors,
        summary: String::new(),
    };
    explanations.summary = summary(disease, &explanations, counterfactuals);
    explanations
}

fn explained(item: &ReasoningItem, explanation: String) -> FactorExplanation {
    FactorExplanation {
        factor: item.factor.clone(),
        explanation,
    }
}

fn assessment_text(assessment: Assessment, reasoning: &ReasoningPaths) -> String {
    let valid = reasoning.valid_reasoning.len();
    let total = reasoning.evaluated();
    let mut text = match assessment {
        Assessment::StrongMatch => format!(
            "The model's reasoning is well-aligned with medical knowledge. {} out of {} factors used in the diagnosis are valid according to the ground truth knowledge graph.",
            valid, total
        ),
        Assessment::PartialMatch => format!(
            "The model's reasoning is partially aligned with medical knowledge. {} out of {} factors used in the diagnosis are valid according to the ground truth knowledge graph.",
            valid, total
        ),
        Assessment::WeakMatch => format!(
            "The model's reasoning shows significant deviations from medical knowledge. Only {} out of {} factors used in the diagnosis are valid according to the ground truth knowledge graph.",
            valid, total
        ),
    };

    let novel = reasoning.novel_reasoning.len();
    if novel > 0 {
        text.push_str(&format!(
            " Additionally, the model introduced {} novel factor(s) not present in the ground truth knowledge.",
            novel
        ));
    }
    text
}

fn valid_text(disease: &str, item: &ReasoningItem) -> String {
    if item.relationship == Relationship::DoesNotHaveSymptom {
        format!(
            "The model correctly identified that {} does not have {}.",
            disease, item.factor
        )
    } else {
        format!(
            "The model correctly identified that {} {} {}.",
            disease,
            item.relationship.phrase(),
            item.factor
        )
    }
}

fn invalid_text(disease: &str, item: &ReasoningItem) -> String {
    if item.relationship == Relationship::DoesNotHaveSymptom {
        return format!(
            "The model incorrectly ruled out {} for {}. Medical knowledge suggests this symptom is common for this disease.",
            item.factor, disease
        );
    }
    if let Some(expected) = item.expected_relationship {
        return format!(
            "The model linked {} to {} as '{}', but medical knowledge links them as '{}'.",
            item.factor,
            disease,
            item.relationship.phrase(),
            expected.phrase()
        );
    }
    match item.alternative_diseases.first() {
        Some(top) => format!(
            "The model incorrectly associated {} with {}. This factor is actually more strongly associated with {}.",
            item.factor, disease, top.disease
        ),
        None => format!(
            "The model incorrectly identified that {} {} {}. This association is not supported by medical knowledge.",
            disease,
            item.relationship.phrase(),
            item.factor
        ),
    }
}

fn novel_text(item: &ReasoningItem) -> String {
    format!(
        "The model introduced a novel factor: {} ({}). This factor is not present in the ground truth knowledge graph, suggesting the model is including new considerations in its diagnosis.",
        item.factor, item.factor_type
    )
}

fn missing_text(disease: &str, missing: &MissingFactor, config: &ExplanationConfig) -> String {
    let phrase = missing.relationship.phrase();
    let weight = format_weight(missing.weight);
    if missing.is_key_symptom {
        format!(
            "The model completely omitted a key symptom: {}. Medical knowledge indicates that {} typically {} {} (importance: {}). This symptom should always be assessed.",
            missing.factor, disease, phrase, missing.factor, weight
        )
    } else if missing.weight > config.critical_weight {
        format!(
            "The model missed a critical factor: {} ({}). Medical knowledge strongly indicates that {} {} {} (importance: {}).",
            missing.factor, missing.factor_type, disease, phrase, missing.factor, weight
        )
    } else if missing.weight > config.important_weight {
        format!(
            "The model missed an important factor: {} ({}). Medical knowledge indicates that {} typically {} {} (importance: {}).",
            missing.factor, missing.factor_type, disease, phrase, missing.factor, weight
        )
    } else {
        format!(
            "The model missed a relevant factor: {} ({}). Medical knowledge suggests {} may {} {} (importance: {}).",
            missing.factor, missing.factor_type, disease, phrase, missing.factor, weight
        )
    }
}

fn missing_priority(a: &MissingFactorExplanation, b: &MissingFactorExplanation) -> Ordering {
    b.weight
        .total_cmp(&a.weight)
        .then_with(|| b.is_key_symptom.cmp(&a.is_key_symptom))
        .then_with(|| a.factor_type.as_str().cmp(b.factor_type.as_str()))
}

/// Concatenate the report; empty sections are left out.
fn summary(disease: &str, explanations: &Explanations, counterfactuals: &Counterfactuals) -> String {
    let assessment = explanations
        .assessment
        .map(|a| a.as_str())
        .unwrap_or("UNKNOWN");
    let mut text = format!(
        "Diagnosis: {}\n\nAssessment: {}\n\n{}\n\n",
        disease, assessment, explanations.assessment_explanation
    );

    let sections = [
        ("CORRECT ASSOCIATIONS:", &explanations.valid_reasoning),
        ("INCORRECT ASSOCIATIONS:", &explanations.invalid_reasoning),
        ("NOVEL FACTORS INTRODUCED:", &explanations.novel_reasoning),
    ];
    for (heading, items) in sections {
        push_section(&mut text, heading, items.iter().map(|i| i.explanation.as_str()));
    }
    push_section(
        &mut text,
        "MISSING IMPORTANT FACTORS:",
        explanations.missing_factors.iter().map(|m| m.explanation.as_str()),
    );

    if let Some(minimal) = &counterfactuals.minimal_changes_explanation {
        text.push_str("ALTERNATIVE DIAGNOSIS:\n");
        text.push_str(&minimal.explanation);
    }
    text
}

fn push_section<'a>(text: &mut String, heading: &str, lines: impl Iterator<Item = &'a str>) {
    let mut lines = lines.peekable();
    if lines.peek().is_none() {
        return;
    }
    text.push_str(heading);
    text.push('\n');
    for line in lines {
        text.push_str("- ");
        text.push_str(line);
        text.push('\n');
    }
    text.push('\n');
}

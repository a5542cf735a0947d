//! Audit policy configuration.
//!
//! Every cutoff the analysis uses lives here under a name, with the
//! empirically chosen values as defaults. The CLI reads these from the
//! `[audit]` table of `medkg.toml`; library callers build them directly.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Symptoms that are always worth assessing, whatever their weight rank.
pub const DEFAULT_KEY_SYMPTOMS: [&str; 4] = ["Fever", "Cough", "Fatigue", "Difficulty Breathing"];

/// All thresholds and weights used by one analysis.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AuditConfig {
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub counterfactual: CounterfactualConfig,
    #[serde(default)]
    pub explanation: ExplanationConfig,
}

/// Reasoning-path validation cutoffs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// A `DOES_NOT_HAVE_SYMPTOM` claim is contradicted by a reference
    /// `HAS_SYMPTOM` link heavier than this.
    #[serde(default = "default_absence_contradiction")]
    pub absence_contradiction_weight: f64,
    /// Reference factors heavier than this must appear in the prediction.
    #[serde(default = "default_important_factor")]
    pub important_factor_weight: f64,
    /// A factor linked under the wrong relationship is flagged only when the
    /// reference link is heavier than this.
    #[serde(default = "default_wrong_relationship")]
    pub wrong_relationship_weight: f64,
    #[serde(default = "default_key_symptoms")]
    pub key_symptoms: Vec<String>,
}

/// Metric and reliability weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Reference factors heavier than this count toward factor coverage.
    #[serde(default = "default_coverage_weight")]
    pub coverage_weight: f64,
    #[serde(default = "default_accuracy_share")]
    pub accuracy_share: f64,
    #[serde(default = "default_similarity_share")]
    pub similarity_share: f64,
    #[serde(default = "default_coverage_share")]
    pub coverage_share: f64,
    #[serde(default = "default_high_reliability")]
    pub high_reliability: f64,
    #[serde(default = "default_medium_reliability")]
    pub medium_reliability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterfactualConfig {
    #[serde(default = "default_max_alternatives")]
    pub max_alternatives: usize,
}

/// Wording tiers for rendered explanations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationConfig {
    #[serde(default = "default_strong_match")]
    pub strong_match: f64,
    #[serde(default = "default_partial_match")]
    pub partial_match: f64,
    /// Missing factors heavier than this are called critical.
    #[serde(default = "default_critical_weight")]
    pub critical_weight: f64,
    /// Missing factors heavier than this (and not critical) are called important.
    #[serde(default = "default_important_weight")]
    pub important_weight: f64,
}

fn default_absence_contradiction() -> f64 { 0.5 }
fn default_important_factor() -> f64 { 0.4 }
fn default_wrong_relationship() -> f64 { 0.5 }
fn default_key_symptoms() -> Vec<String> {
    DEFAULT_KEY_SYMPTOMS.iter().map(|s| s.to_string()).collect()
}
fn default_coverage_weight() -> f64 { 0.5 }
fn default_accuracy_share() -> f64 { 0.4 }
fn default_similarity_share() -> f64 { 0.3 }
fn default_coverage_share() -> f64 { 0.3 }
fn default_high_reliability() -> f64 { 0.8 }
fn default_medium_reliability() -> f64 { 0.5 }
fn default_max_alternatives() -> usize { 3 }
fn default_strong_match() -> f64 { 0.8 }
fn default_partial_match() -> f64 { 0.5 }
fn default_critical_weight() -> f64 { 0.7 }
fn default_important_weight() -> f64 { 0.5 }

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            absence_contradiction_weight: default_absence_contradiction(),
            important_factor_weight: default_important_factor(),
            wrong_relationship_weight: default_wrong_relationship(),
            key_symptoms: default_key_symptoms(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            coverage_weight: default_coverage_weight(),
            accuracy_share: default_accuracy_share(),
            similarity_share: default_similarity_share(),
            coverage_share: default_coverage_share(),
            high_reliability: default_high_reliability(),
            medium_reliability: default_medium_reliability(),
        }
    }
}

impl Default for CounterfactualConfig {
    fn default() -> Self {
        Self {
            max_alternatives: default_max_alternatives(),
        }
    }
}

impl Default for ExplanationConfig {
    fn default() -> Self {
        Self {
            strong_match: default_strong_match(),
            partial_match: default_partial_match(),
            critical_weight: default_critical_weight(),
            important_weight: default_important_weight(),
        }
    }
}

impl ValidationConfig {
    pub fn is_key_symptom(&self, factor: &str) -> bool {
        self.key_symptoms.iter().any(|s| s == factor)
    }
}

impl AuditConfig {
    /// Check that every threshold is a fraction and the confidence shares
    /// cannot push the score above 1.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let thresholds = [
            ("validation.absence_contradiction_weight", self.validation.absence_contradiction_weight),
            ("validation.important_factor_weight", self.validation.important_factor_weight),
            ("validation.wrong_relationship_weight", self.validation.wrong_relationship_weight),
            ("scoring.coverage_weight", self.scoring.coverage_weight),
            ("scoring.accuracy_share", self.scoring.accuracy_share),
            ("scoring.similarity_share", self.scoring.similarity_share),
            ("scoring.coverage_share", self.scoring.coverage_share),
            ("scoring.high_reliability", self.scoring.high_reliability),
            ("scoring.medium_reliability", self.scoring.medium_reliability),
            ("explanation.strong_match", self.explanation.strong_match),
            ("explanation.partial_match", self.explanation.partial_match),
            ("explanation.critical_weight", self.explanation.critical_weight),
            ("explanation.important_weight", self.explanation.important_weight),
        ];
        for (name, value) in thresholds {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidThreshold { name, value });
            }
        }

        let shares =
            self.scoring.accuracy_share + self.scoring.similarity_share + self.scoring.coverage_share;
        if shares > 1.0 + 1e-9 {
            return Err(ConfigError::SharesExceedOne(shares));
        }

        if self.counterfactual.max_alternatives == 0 {
            return Err(ConfigError::ZeroLimit("counterfactual.max_alternatives"));
        }
        Ok(())
    }
}

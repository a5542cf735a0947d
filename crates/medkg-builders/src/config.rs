//! Reference builder configuration and the age group table.

use medkg_core::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A named, inclusive age range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeGroup {
    pub name: String,
    pub min_age: u32,
    pub max_age: u32,
}

impl AgeGroup {
    pub fn new(name: impl Into<String>, min_age: u32, max_age: u32) -> Self {
        Self {
            name: name.into(),
            min_age,
            max_age,
        }
    }

    /// Node id of this group, e.g. `Senior Age`.
    pub fn node_id(&self) -> String {
        format!("{} Age", self.name)
    }

    pub fn contains(&self, age: u32) -> bool {
        self.min_age <= age && age <= self.max_age
    }

    pub fn to_node(&self) -> Node {
        Node::new(self.node_id(), NodeType::AgeGroup)
            .with_attribute("min_age", self.min_age)
            .with_attribute("max_age", self.max_age)
    }
}

pub fn default_age_groups() -> Vec<AgeGroup> {
    vec![
        AgeGroup::new("Child", 0, 17),
        AgeGroup::new("Young Adult", 18, 34),
        AgeGroup::new("Middle Aged", 35, 59),
        AgeGroup::new("Senior", 60, 120),
    ]
}

/// The group an age falls in; ages the table does not cover go to the last group.
pub fn age_group_for(groups: &[AgeGroup], age: u32) -> Option<&AgeGroup> {
    groups.iter().find(|g| g.contains(age)).or_else(|| groups.last())
}

/// Whole years from a number or numeric string, truncated.
/// Negative or unreadable ages give `None`.
pub fn parse_age(value: &Value) -> Option<u32> {
    let age = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    }
    .trunc();
    (age.is_finite() && age >= 0.0 && age <= u32::MAX as f64).then_some(age as u32)
}

/// How patient records become a reference graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceConfig {
    /// Yes/No columns turned into symptom nodes.
    #[serde(default = "default_symptom_columns")]
    pub symptom_columns: Vec<String>,
    /// A symptom is linked when its "Yes" share for a disease exceeds this.
    #[serde(default = "default_symptom_threshold")]
    pub symptom_threshold: f64,
    /// Age, gender, blood pressure and cholesterol categories are linked
    /// when their share for a disease exceeds this.
    #[serde(default = "default_demographic_threshold")]
    pub demographic_threshold: f64,
    #[serde(default = "default_age_groups")]
    pub age_groups: Vec<AgeGroup>,
}

fn default_symptom_columns() -> Vec<String> {
    DEFAULT_KEY_SYMPTOMS.iter().map(|s| s.to_string()).collect()
}
fn default_symptom_threshold() -> f64 { 0.4 }
fn default_demographic_threshold() -> f64 { 0.3 }

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            symptom_columns: default_symptom_columns(),
            symptom_threshold: default_symptom_threshold(),
            demographic_threshold: default_demographic_threshold(),
            age_groups: default_age_groups(),
        }
    }
}

impl ReferenceConfig {
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        for (name, value) in [
            ("reference.symptom_threshold", self.symptom_threshold),
            ("reference.demographic_threshold", self.demographic_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidThreshold { name, value });
            }
        }
        if self.age_groups.is_empty() {
            return Err(ConfigError::ZeroLimit("reference.age_groups"));
        }
        Ok(())
    }
}

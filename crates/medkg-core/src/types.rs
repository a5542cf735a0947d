//! Shared types used across every medkg crate.
//!
//! The string forms of [`NodeType`] and [`Relationship`] are the ones the graph
//! documents carry on the wire (`"Age Group"`, `"HAS_SYMPTOM"`, ...). The
//! CamelCase spellings of the multi-word node types are accepted as aliases.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// The kind of entity a node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NodeType {
    Disease,
    Symptom,
    #[serde(rename = "Age Group", alias = "AgeGroup")]
    AgeGroup,
    Gender,
    #[serde(rename = "Blood Pressure", alias = "BloodPressure")]
    BloodPressure,
    #[serde(rename = "Cholesterol Level", alias = "CholesterolLevel")]
    CholesterolLevel,
}

impl NodeType {
    pub const ALL: [NodeType; 6] = [
        NodeType::Disease,
        NodeType::Symptom,
        NodeType::AgeGroup,
        NodeType::Gender,
        NodeType::BloodPressure,
        NodeType::CholesterolLevel,
    ];

    /// Wire name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Disease => "Disease",
            NodeType::Symptom => "Symptom",
            NodeType::AgeGroup => "Age Group",
            NodeType::Gender => "Gender",
            NodeType::BloodPressure => "Blood Pressure",
            NodeType::CholesterolLevel => "Cholesterol Level",
        }
    }

    /// Whether nodes of this type are factors (anything but a disease).
    pub fn is_factor(&self) -> bool {
        !matches!(self, NodeType::Disease)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The typed relationship carried by a disease → factor link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Relationship {
    HasSymptom,
    DoesNotHaveSymptom,
    CommonIn,
    PrevalentIn,
    AssociatedWith,
    CorrelatedWith,
}

impl Relationship {
    pub const ALL: [Relationship; 6] = [
        Relationship::HasSymptom,
        Relationship::DoesNotHaveSymptom,
        Relationship::CommonIn,
        Relationship::PrevalentIn,
        Relationship::AssociatedWith,
        Relationship::CorrelatedWith,
    ];

    /// Wire name, e.g. `HAS_SYMPTOM`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Relationship::HasSymptom => "HAS_SYMPTOM",
            Relationship::DoesNotHaveSymptom => "DOES_NOT_HAVE_SYMPTOM",
            Relationship::CommonIn => "COMMON_IN",
            Relationship::PrevalentIn => "PREVALENT_IN",
            Relationship::AssociatedWith => "ASSOCIATED_WITH",
            Relationship::CorrelatedWith => "CORRELATED_WITH",
        }
    }

    /// Lower-case phrase used in explanation sentences, e.g. `has symptom`.
    pub fn phrase(&self) -> &'static str {
        match self {
            Relationship::HasSymptom => "has symptom",
            Relationship::DoesNotHaveSymptom => "does not have symptom",
            Relationship::CommonIn => "common in",
            Relationship::PrevalentIn => "prevalent in",
            Relationship::AssociatedWith => "associated with",
            Relationship::CorrelatedWith => "correlated with",
        }
    }

    /// The node type a target of this relationship has when nothing else is known.
    pub fn target_type(&self) -> NodeType {
        match self {
            Relationship::HasSymptom | Relationship::DoesNotHaveSymptom => NodeType::Symptom,
            Relationship::CommonIn => NodeType::AgeGroup,
            Relationship::PrevalentIn => NodeType::Gender,
            Relationship::AssociatedWith => NodeType::BloodPressure,
            Relationship::CorrelatedWith => NodeType::CholesterolLevel,
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which of the two audited graphs something belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphRole {
    GroundTruth,
    Prediction,
}

impl GraphRole {
    /// Weight given to a link whose document omits it.
    ///
    /// Prediction links describe a single observation and carry a fixed
    /// evidence strength; an unweighted reference link carries none.
    pub fn default_weight(&self) -> f64 {
        match self {
            GraphRole::GroundTruth => 0.0,
            GraphRole::Prediction => 1.0,
        }
    }
}

impl fmt::Display for GraphRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphRole::GroundTruth => f.write_str("ground truth"),
            GraphRole::Prediction => f.write_str("prediction"),
        }
    }
}

/// A node of a knowledge graph document.
///
/// Extra keys (for instance `min_age`/`max_age` on age groups) are kept in
/// `attributes` and written back out untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_novel: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub custom: bool,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, Value>,
}

impl Node {
    pub fn new(id: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            id: id.into(),
            node_type,
            is_novel: false,
            custom: false,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_novel(mut self, is_novel: bool) -> Self {
        self.is_novel = is_novel;
        self
    }

    pub fn with_custom(mut self, custom: bool) -> Self {
        self.custom = custom;
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// A normalized, loaded link: endpoints are plain node ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub source: String,
    pub target: String,
    pub relationship: Relationship,
    pub weight: f64,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_novel: bool,
}

impl Link {
    /// The identity of a link inside one graph.
    pub fn key(&self) -> (&str, &str, Relationship) {
        (&self.source, &self.target, self.relationship)
    }
}

/// One outgoing link of a disease, seen from the disease.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub target: String,
    pub relationship: Relationship,
    pub weight: f64,
}

impl From<&Link> for Connection {
    fn from(link: &Link) -> Self {
        Self {
            target: link.target.clone(),
            relationship: link.relationship,
            weight: link.weight,
        }
    }
}

/// Rounds to two decimals the way evidence strings print weights.
pub fn format_weight(weight: f64) -> String {
    format!("{:.2}", weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_types_use_document_spelling() {
        let json = serde_json::to_string(&NodeType::AgeGroup).unwrap();
        assert_eq!(json, "\"Age Group\"");
        let parsed: NodeType = serde_json::from_str("\"BloodPressure\"").unwrap();
        assert_eq!(parsed, NodeType::BloodPressure);
        let parsed: NodeType = serde_json::from_str("\"Cholesterol Level\"").unwrap();
        assert_eq!(parsed, NodeType::CholesterolLevel);
    }

    #[test]
    fn relationships_are_screaming_snake_case() {
        for rel in Relationship::ALL {
            let json = serde_json::to_string(&rel).unwrap();
            assert_eq!(json, format!("\"{}\"", rel.as_str()));
        }
        assert_eq!(Relationship::DoesNotHaveSymptom.phrase(), "does not have symptom");
    }

    #[test]
    fn node_keeps_extra_attributes() {
        let node: Node = serde_json::from_str(
            r#"{"id": "Child Age", "type": "Age Group", "min_age": 0, "max_age": 17}"#,
        )
        .unwrap();
        assert_eq!(node.node_type, NodeType::AgeGroup);
        assert!(!node.is_novel);
        assert_eq!(node.attributes.get("max_age"), Some(&Value::from(17)));

        let out = serde_json::to_value(&node).unwrap();
        assert_eq!(out["min_age"], Value::from(0));
        assert!(out.get("is_novel").is_none());
    }

    #[test]
    fn relationship_target_types() {
        assert_eq!(Relationship::CommonIn.target_type(), NodeType::AgeGroup);
        assert_eq!(Relationship::DoesNotHaveSymptom.target_type(), NodeType::Symptom);
        assert!(!NodeType::Disease.is_factor());
        assert!(NodeType::Gender.is_factor());
    }
}

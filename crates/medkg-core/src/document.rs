//! The `{nodes, links}` document format exchanged with graph builders and
//! renderers.
//!
//! A document is the raw, unvalidated form of a graph. Link endpoints may be
//! either a node id or a nested `{ "id": ... }` object (renderers rewrite
//! endpoints into node objects); [`Endpoint::id`] is the single place that
//! difference is resolved.

use crate::error::GraphError;
use crate::types::{GraphRole, Link, Node, Relationship};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A knowledge graph document as it appears on disk or on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: Vec<Node>,
    pub links: Vec<LinkRecord>,
}

/// One link of a document, before endpoint normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub source: Endpoint,
    pub target: Endpoint,
    pub relationship: Relationship,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_novel: bool,
}

impl LinkRecord {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        relationship: Relationship,
        weight: f64,
    ) -> Self {
        Self {
            source: Endpoint::Id(source.into()),
            target: Endpoint::Id(target.into()),
            relationship,
            weight: Some(weight),
            is_novel: false,
        }
    }

    pub fn with_novel(mut self, is_novel: bool) -> Self {
        self.is_novel = is_novel;
        self
    }

    /// Normalize endpoints and fill in the role's default weight.
    pub fn normalize(&self, role: GraphRole) -> Link {
        Link {
            source: self.source.id().to_string(),
            target: self.target.id().to_string(),
            relationship: self.relationship,
            weight: self.weight.unwrap_or_else(|| role.default_weight()),
            is_novel: self.is_novel,
        }
    }
}

impl From<&Link> for LinkRecord {
    fn from(link: &Link) -> Self {
        LinkRecord::new(
            link.source.clone(),
            link.target.clone(),
            link.relationship,
            link.weight,
        )
        .with_novel(link.is_novel)
    }
}

/// A link endpoint: a bare node id or an embedded node object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Endpoint {
    Id(String),
    Node { id: String },
}

impl Endpoint {
    pub fn id(&self) -> &str {
        match self {
            Endpoint::Id(id) => id,
            Endpoint::Node { id } => id,
        }
    }
}

impl GraphDocument {
    /// Parse a document from an already-decoded JSON value.
    pub fn from_value(role: GraphRole, value: Value) -> Result<Self, GraphError> {
        if !value.is_object() {
            return Err(GraphError::malformed(role, "document is not a JSON object"));
        }
        serde_json::from_value(value).map_err(|e| GraphError::malformed(role, e.to_string()))
    }

    /// Parse a document from JSON text.
    pub fn from_json_str(role: GraphRole, json: &str) -> Result<Self, GraphError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| GraphError::malformed(role, e.to_string()))?;
        Self::from_value(role, value)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Push a node unless one with the same id is already present.
    ///
    /// Returns whether the node was added.
    pub fn add_node(&mut self, node: Node) -> bool {
        if self.contains_node(&node.id) {
            return false;
        }
        self.nodes.push(node);
        true
    }

    pub fn add_link(&mut self, link: LinkRecord) {
        self.links.push(link);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodeType;
    use serde_json::json;

    #[test]
    fn nested_endpoints_unwrap_to_ids() {
        let doc = GraphDocument::from_value(
            GraphRole::GroundTruth,
            json!({
                "nodes": [
                    {"id": "Flu", "type": "Disease"},
                    {"id": "Fever", "type": "Symptom"}
                ],
                "links": [
                    {"source": {"id": "Flu", "type": "Disease"}, "target": "Fever",
                     "relationship": "HAS_SYMPTOM", "weight": 0.7}
                ]
            }),
        )
        .unwrap();

        let link = doc.links[0].normalize(GraphRole::GroundTruth);
        assert_eq!(link.source, "Flu");
        assert_eq!(link.target, "Fever");
        assert!((link.weight - 0.7).abs() < 1e-9);
    }

    #[test]
    fn missing_weight_takes_role_default() {
        let record = LinkRecord {
            source: Endpoint::Id("Flu".into()),
            target: Endpoint::Id("Fever".into()),
            relationship: Relationship::HasSymptom,
            weight: None,
            is_novel: false,
        };
        assert_eq!(record.normalize(GraphRole::Prediction).weight, 1.0);
        assert_eq!(record.normalize(GraphRole::GroundTruth).weight, 0.0);
    }

    #[test]
    fn missing_required_keys_are_malformed() {
        let err = GraphDocument::from_value(
            GraphRole::Prediction,
            json!({"nodes": [{"id": "Flu"}], "links": []}),
        )
        .unwrap_err();
        assert!(matches!(err, GraphError::MalformedGraph { graph: GraphRole::Prediction, .. }));

        let err = GraphDocument::from_value(
            GraphRole::Prediction,
            json!({"nodes": [], "links": [{"source": "a", "target": "b"}]}),
        )
        .unwrap_err();
        assert!(err.to_string().contains("relationship"));

        let err = GraphDocument::from_json_str(GraphRole::GroundTruth, "[1, 2]").unwrap_err();
        assert!(matches!(err, GraphError::MalformedGraph { .. }));
    }

    #[test]
    fn add_node_ignores_duplicates() {
        let mut doc = GraphDocument::default();
        assert!(doc.add_node(Node::new("Flu", NodeType::Disease)));
        assert!(!doc.add_node(Node::new("Flu", NodeType::Symptom)));
        assert_eq!(doc.nodes.len(), 1);
        assert_eq!(doc.nodes[0].node_type, NodeType::Disease);
    }
}

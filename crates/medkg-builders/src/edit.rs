//! Hand edits to a reference graph document.
//!
//! An edit either adds a new disease or replaces every link of an existing
//! one. Targets the document does not know yet are created as custom nodes,
//! typed after the relationship that reaches them.

use medkg_core::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Weight given to a connection that does not state one.
pub const DEFAULT_CONNECTION_WEIGHT: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditAction {
    Add,
    Modify,
}

/// One link to create from the edited disease.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionSpec {
    pub target: String,
    pub relationship: Relationship,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl ConnectionSpec {
    pub fn new(target: impl Into<String>, relationship: Relationship) -> Self {
        Self {
            target: target.into(),
            relationship,
            weight: None,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn weight(&self) -> f64 {
        self.weight.unwrap_or(DEFAULT_CONNECTION_WEIGHT)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdit {
    pub disease: String,
    pub action: EditAction,
    #[serde(default)]
    pub connections: Vec<ConnectionSpec>,
}

impl GraphEdit {
    pub fn add(disease: impl Into<String>, connections: Vec<ConnectionSpec>) -> Self {
        Self {
            disease: disease.into(),
            action: EditAction::Add,
            connections,
        }
    }

    pub fn modify(disease: impl Into<String>, connections: Vec<ConnectionSpec>) -> Self {
        Self {
            disease: disease.into(),
            action: EditAction::Modify,
            connections,
        }
    }

    /// Apply the edit. The document is left untouched unless the edited
    /// version still loads as a ground-truth graph.
    pub fn apply(&self, doc: &mut GraphDocument) -> Result<()> {
        let disease = self.disease.trim();
        if disease.is_empty() {
            return Err(EditError::EmptyDiseaseName.into());
        }
        for conn in &self.connections {
            let weight = conn.weight();
            if !(0.0..=1.0).contains(&weight) {
                return Err(EditError::InvalidWeight {
                    target: conn.target.clone(),
                    relationship: conn.relationship,
                    weight,
                }
                .into());
            }
        }

        let exists = doc
            .node(disease)
            .map(|n| n.node_type == NodeType::Disease)
            .unwrap_or(false);
        let mut edited = doc.clone();
        match self.action {
            EditAction::Add if exists => return Err(EditError::DiseaseExists(disease.to_string()).into()),
            EditAction::Modify if !exists => {
                return Err(EditError::DiseaseNotFound(disease.to_string()).into())
            }
            EditAction::Add => {
                edited.nodes.push(Node::new(disease, NodeType::Disease));
            }
            EditAction::Modify => {
                let before = edited.links.len();
                edited.links.retain(|link| link.source.id() != disease);
                debug!(disease, removed = before - edited.links.len(), "cleared disease links");
            }
        }

        for conn in &self.connections {
            if edited.add_node(Node::new(conn.target.clone(), conn.relationship.target_type()).with_custom(true)) {
                debug!(target = conn.target.as_str(), "created custom node");
            }
            edited.add_link(LinkRecord::new(disease, conn.target.clone(), conn.relationship, conn.weight()));
        }

        KnowledgeGraph::from_document(GraphRole::GroundTruth, &edited)?;
        *doc = edited;
        info!(
            disease,
            action = ?self.action,
            connections = self.connections.len(),
            "applied graph edit"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> GraphDocument {
        GraphDocument::from_value(
            GraphRole::GroundTruth,
            json!({
                "nodes": [
                    {"id": "Flu", "type": "Disease"},
                    {"id": "Fever", "type": "Symptom"},
                    {"id": "Senior Age", "type": "Age Group"}
                ],
                "links": [
                    {"source": "Flu", "target": "Fever", "relationship": "HAS_SYMPTOM", "weight": 0.8},
                    {"source": "Flu", "target": "Senior Age", "relationship": "COMMON_IN", "weight": 0.4}
                ]
            }),
        )
        .unwrap()
    }

    #[test]
    fn add_creates_custom_targets() {
        let mut doc = doc();
        GraphEdit::add(
            "Measles",
            vec![
                ConnectionSpec::new("Fever", Relationship::HasSymptom).with_weight(0.9),
                ConnectionSpec::new("Rash", Relationship::HasSymptom),
                ConnectionSpec::new("Child Age", Relationship::CommonIn),
            ],
        )
        .apply(&mut doc)
        .unwrap();

        let graph = KnowledgeGraph::from_document(GraphRole::GroundTruth, &doc).unwrap();
        assert_eq!(graph.disease_ids(), vec!["Flu", "Measles"]);
        assert_eq!(graph.custom_symptom_ids(), vec!["Rash"]);
        assert_eq!(graph.node_type("Child Age"), Some(NodeType::AgeGroup));
        assert!(!graph.node("Fever").unwrap().custom, "existing nodes stay as they were");

        let rash = graph.find_link("Measles", "Rash", Relationship::HasSymptom).unwrap();
        assert_eq!(rash.weight, DEFAULT_CONNECTION_WEIGHT);
    }

    #[test]
    fn modify_replaces_links() {
        let mut doc = doc();
        GraphEdit::modify("Flu", vec![ConnectionSpec::new("Cough", Relationship::HasSymptom).with_weight(0.7)])
            .apply(&mut doc)
            .unwrap();

        let graph = KnowledgeGraph::from_document(GraphRole::GroundTruth, &doc).unwrap();
        let connections = graph.connections("Flu").unwrap();
        assert_eq!(connections.len(), 1);
        assert_eq!(connections[0].target, "Cough");
        assert!(graph.contains("Fever"), "nodes are kept when their links go");
    }

    #[test]
    fn rejected_edits_leave_the_document_alone() {
        let mut doc = doc();
        let original = doc.clone();

        let err = GraphEdit::add("Flu", vec![]).apply(&mut doc).unwrap_err();
        assert!(matches!(err, MedkgError::Edit(EditError::DiseaseExists(_))));

        let err = GraphEdit::modify("Measles", vec![]).apply(&mut doc).unwrap_err();
        assert!(matches!(err, MedkgError::Edit(EditError::DiseaseNotFound(_))));

        let err = GraphEdit::add("  ", vec![]).apply(&mut doc).unwrap_err();
        assert!(matches!(err, MedkgError::Edit(EditError::EmptyDiseaseName)));

        let err = GraphEdit::add("Measles", vec![ConnectionSpec::new("Rash", Relationship::HasSymptom).with_weight(1.5)])
            .apply(&mut doc)
            .unwrap_err();
        assert!(matches!(err, MedkgError::Edit(EditError::InvalidWeight { .. })));

        // A symptom id reused as a disease would clash on load.
        let err = GraphEdit::add("Fever", vec![]).apply(&mut doc).unwrap_err();
        assert!(matches!(err, MedkgError::Graph(_)));

        assert_eq!(doc, original);
    }

    #[test]
    fn reads_edit_requests() {
        let edit: GraphEdit = serde_json::from_value(json!({
            "disease": "Flu",
            "action": "modify",
            "connections": [{"target": "Fever", "relationship": "HAS_SYMPTOM"}]
        }))
        .unwrap();
        assert_eq!(edit.action, EditAction::Modify);
        assert_eq!(edit.connections[0].weight(), 0.5);
    }
}

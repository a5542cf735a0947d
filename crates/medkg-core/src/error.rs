//! Error types for medkg operations.
//!
//! Only malformed input is an error. Conditions the analysis can still report
//! on (no predicted disease, a disease unknown to the reference graph, empty
//! factor sets) are carried as data in the result bundle instead.

use crate::types::{GraphRole, Relationship};
use thiserror::Error;

/// Result type for medkg operations.
pub type Result<T> = std::result::Result<T, MedkgError>;

/// Top-level error for every fallible medkg operation.
#[derive(Debug, Error)]
pub enum MedkgError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Load-time failures. Both are terminal: no analysis stage runs on a graph
/// that produced one of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// The document is not a `{nodes, links}` graph with the required keys
    /// and well-typed values.
    #[error("malformed {graph} graph: {reason}")]
    MalformedGraph { graph: GraphRole, reason: String },

    /// A link names a node that the document never declares.
    #[error("unresolved reference in {graph} graph: link #{link} points to unknown node '{node}'")]
    UnresolvedReference {
        graph: GraphRole,
        link: usize,
        node: String,
    },
}

impl GraphError {
    pub fn malformed(graph: GraphRole, reason: impl Into<String>) -> Self {
        GraphError::MalformedGraph {
            graph,
            reason: reason.into(),
        }
    }
}

/// The prediction graph has no Disease node to audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("No predicted disease found")]
pub struct NoPredictionError;

/// Failures while turning raw records into graph documents.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("invalid prediction format: {0}")]
    InvalidPrediction(String),

    #[error("no predicted disease found in the result")]
    MissingDisease,

    #[error("invalid patient records: {0}")]
    InvalidRecords(String),

    #[error("record {row} is missing column '{column}'")]
    MissingColumn { row: usize, column: String },
}

/// Failures while editing a reference graph document.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    #[error("disease name is required")]
    EmptyDiseaseName,

    #[error("disease '{0}' already exists")]
    DiseaseExists(String),

    #[error("disease '{0}' not found")]
    DiseaseNotFound(String),

    #[error("connection {relationship} -> '{target}' has weight {weight} outside 0.0-1.0")]
    InvalidWeight {
        target: String,
        relationship: Relationship,
        weight: f64,
    },
}

/// Rejected audit configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} = {value} is outside 0.0-1.0")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error("confidence shares sum to {0}, expected at most 1.0")]
    SharesExceedOne(f64),

    #[error("{0} must be at least 1")]
    ZeroLimit(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_graph() {
        let err = GraphError::malformed(GraphRole::Prediction, "missing field `type`");
        assert_eq!(err.to_string(), "malformed prediction graph: missing field `type`");

        let err = GraphError::UnresolvedReference {
            graph: GraphRole::GroundTruth,
            link: 3,
            node: "Rash".into(),
        };
        assert!(err.to_string().contains("ground truth"));
        assert!(err.to_string().contains("'Rash'"));
    }

    #[test]
    fn wraps_into_top_level() {
        let err: MedkgError = EditError::DiseaseNotFound("Flu".into()).into();
        assert_eq!(err.to_string(), "disease 'Flu' not found");
        assert_eq!(NoPredictionError.to_string(), "No predicted disease found");
    }
}

//! Loading the ground-truth / prediction pair.
//!
//! Both documents are parsed and validated up front; nothing downstream
//! touches raw JSON again.

use crate::document::GraphDocument;
use crate::error::{GraphError, NoPredictionError};
use crate::graph::KnowledgeGraph;
use crate::types::GraphRole;
use serde_json::Value;
use tracing::{debug, info, warn};

/// The two graphs under audit plus the disease the prediction names.
#[derive(Debug, Clone)]
pub struct KnowledgeGraphPair {
    pub ground_truth: KnowledgeGraph,
    pub prediction: KnowledgeGraph,
    predicted_disease: Option<String>,
}

impl KnowledgeGraphPair {
    /// Pair two loaded graphs and identify the predicted disease.
    ///
    /// The first Disease node of the prediction (document order) is the
    /// predicted disease. A prediction describes one case, so extra disease
    /// nodes are logged and ignored.
    pub fn new(ground_truth: KnowledgeGraph, prediction: KnowledgeGraph) -> Self {
        let mut diseases = prediction.diseases().map(|n| n.id.clone());
        let predicted_disease = diseases.next();
        let extra = diseases.count();

        match &predicted_disease {
            Some(disease) if extra > 0 => warn!(
                disease = disease.as_str(),
                ignored = extra,
                "prediction graph has several Disease nodes; auditing the first"
            ),
            Some(disease) => debug!(disease = disease.as_str(), "predicted disease identified"),
            None => warn!("prediction graph has no Disease node"),
        }

        Self {
            ground_truth,
            prediction,
            predicted_disease,
        }
    }

    /// The disease the prediction commits to.
    pub fn predicted_disease(&self) -> Result<&str, NoPredictionError> {
        self.predicted_disease.as_deref().ok_or(NoPredictionError)
    }

    /// Whether the reference graph knows the predicted disease at all.
    pub fn disease_in_ground_truth(&self) -> bool {
        self.predicted_disease
            .as_deref()
            .map(|d| self.ground_truth.contains(d))
            .unwrap_or(false)
    }
}

/// Load a pair from decoded JSON documents.
pub fn load(ground_truth_doc: &Value, prediction_doc: &Value) -> Result<KnowledgeGraphPair, GraphError> {
    let ground_truth = GraphDocument::from_value(GraphRole::GroundTruth, ground_truth_doc.clone())?;
    let prediction = GraphDocument::from_value(GraphRole::Prediction, prediction_doc.clone())?;
    load_documents(&ground_truth, &prediction)
}

/// Load a pair from JSON text.
pub fn load_str(ground_truth_json: &str, prediction_json: &str) -> Result<KnowledgeGraphPair, GraphError> {
    let ground_truth = GraphDocument::from_json_str(GraphRole::GroundTruth, ground_truth_json)?;
    let prediction = GraphDocument::from_json_str(GraphRole::Prediction, prediction_json)?;
    load_documents(&ground_truth, &prediction)
}

/// Load a pair from parsed documents.
pub fn load_documents(
    ground_truth: &GraphDocument,
    prediction: &GraphDocument,
) -> Result<KnowledgeGraphPair, GraphError> {
    let ground_truth = KnowledgeGraph::from_document(GraphRole::GroundTruth, ground_truth)?;
    let prediction = KnowledgeGraph::from_document(GraphRole::Prediction, prediction)?;

    info!(
        ground_truth_nodes = ground_truth.node_count(),
        ground_truth_links = ground_truth.link_count(),
        prediction_nodes = prediction.node_count(),
        prediction_links = prediction.link_count(),
        "loaded knowledge graphs"
    );

    Ok(KnowledgeGraphPair::new(ground_truth, prediction))
}

//! # medkg
//!
//! Audit an AI model's disease prediction against a ground-truth medical
//! knowledge graph.
//!
//! A reference graph, built from many patient records, links each disease to
//! the symptoms and demographics seen with it and how often. A prediction
//! graph links the disease a model chose to the factors it cited for one
//! patient. medkg compares the two, checks every cited factor, names the
//! important factors the model skipped, proposes the closest alternative
//! diagnoses and scores how far the prediction can be trusted.
//!
//! ## Quick Start
//!
//! ```rust
//! use medkg::prelude::*;
//! use serde_json::json;
//!
//! let ground_truth = json!({
//!     "nodes": [
//!         {"id": "Flu", "type": "Disease"},
//!         {"id": "Fever", "type": "Symptom"},
//!         {"id": "Cough", "type": "Symptom"}
//!     ],
//!     "links": [
//!         {"source": "Flu", "target": "Fever", "relationship": "HAS_SYMPTOM", "weight": 0.9},
//!         {"source": "Flu", "target": "Cough", "relationship": "HAS_SYMPTOM", "weight": 0.6}
//!     ]
//! });
//! let prediction = json!({
//!     "nodes": [{"id": "Flu", "type": "Disease"}, {"id": "Fever", "type": "Symptom"}],
//!     "links": [{"source": "Flu", "target": "Fever", "relationship": "HAS_SYMPTOM"}]
//! });
//!
//! let pair = load(&ground_truth, &prediction).unwrap();
//! let bundle = analyze(&pair);
//!
//! assert_eq!(bundle.reasoning_paths.reasoning_accuracy, 1.0);
//! assert_eq!(bundle.reasoning_paths.missing_important_factors[0].factor, "Cough");
//! println!("{}", bundle.explanations.summary);
//! ```
//!
//! ## From a model answer
//!
//! ```rust
//! use medkg::prelude::*;
//! use serde_json::json;
//!
//! let records = vec![
//!     json!({"Disease": "Flu", "Fever": "Yes", "Cough": "Yes"}),
//!     json!({"Disease": "Cold", "Fever": "No", "Cough": "Yes"}),
//! ];
//! let reference = build_reference(&records, &ReferenceConfig::default()).unwrap();
//!
//! let answer = json!({"result": [{"predicted disease": "Cold", "Cough": "Yes", "Rash": "Yes"}]});
//! let report = audit(&reference, &answer, &Vocabulary::default(), &AuditConfig::default()).unwrap();
//!
//! // "Rash" is outside the known vocabulary.
//! assert_eq!(report.bundle.reasoning_paths.novel_reasoning[0].factor, "Rash");
//! ```
//!
//! ## Architecture
//!
//! - [`medkg_core`] - node and link types, graph model, loader, errors, configuration
//! - [`medkg_analysis`] - the comparison, validation, counterfactual and explanation pipeline
//! - [`medkg_builders`] - reference and prediction builders, vocabulary files, graph edits
//!
//! ## Pipeline
//!
//! | Stage | Produces |
//! |-------|----------|
//! | Structural | node and relationship counts per graph |
//! | Semantic | shared and one-sided factors per relationship |
//! | Reasoning | valid, invalid and novel reasoning, missing important factors |
//! | Counterfactual | closest other diseases and the edits that reach them |
//! | Metrics | accuracy, similarity, coverage, novelty, confidence, reliability |
//! | Explanations | sentences per finding and a plain-text summary |
//! | Visualization | one merged graph with each element's provenance |

pub use medkg_analysis as analysis;
pub use medkg_builders as builders;
pub use medkg_core as core;

/// Prelude module for convenient imports.
///
/// ```rust
/// use medkg::prelude::*;
/// ```
pub mod prelude {
    pub use medkg_builders::prelude::*;
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

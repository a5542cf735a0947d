//! # medkg Analysis
//!
//! The audit pipeline over a loaded ground-truth / prediction pair.
//!
//! Stages run in a fixed order, each reading only earlier sections of the
//! result bundle:
//!
//! | Stage | Module | Output |
//! |-------|--------|--------|
//! | Structural | [`structural`] | node and relationship histograms, shared diseases |
//! | Semantic | [`semantic`] | per-relationship match sets, overall similarity |
//! | Reasoning | [`reasoning`] | valid / invalid / novel items, missing factors |
//! | Counterfactual | [`counterfactual`] | closest alternative diagnoses and edit sets |
//! | Metrics | [`metrics`] | coverage, novelty, confidence, reliability |
//! | Explanations | [`explain`] | template sentences and the summary report |
//! | Visualization | [`visualize`] | merged provenance-tagged graph |
//!
//! A prediction without a disease node never fails the run: every section
//! carries an `error` string and empty results instead.
//!
//! ## Quick Start
//!
//! ```rust
//! use medkg_analysis::prelude::*;
//! use serde_json::json;
//!
//! let ground_truth = json!({
//!     "nodes": [{"id": "Flu", "type": "Disease"}, {"id": "Fever", "type": "Symptom"}],
//!     "links": [{"source": "Flu", "target": "Fever", "relationship": "HAS_SYMPTOM", "weight": 0.9}]
//! });
//! let prediction = json!({
//!     "nodes": [{"id": "Flu", "type": "Disease"}, {"id": "Fever", "type": "Symptom"}],
//!     "links": [{"source": "Flu", "target": "Fever", "relationship": "HAS_SYMPTOM"}]
//! });
//!
//! let pair = load(&ground_truth, &prediction).unwrap();
//! let bundle = analyze(&pair);
//! assert_eq!(bundle.explanations.assessment, Some(Assessment::StrongMatch));
//! ```

pub mod bundle;
pub mod counterfactual;
pub mod explain;
pub mod metrics;
pub mod pipeline;
pub mod prelude;
pub mod reasoning;
pub mod semantic;
pub mod structural;
pub mod visualize;

pub use bundle::{AnalysisResultBundle, Stage};
pub use pipeline::{analyze, analyze_with, Analyzer};

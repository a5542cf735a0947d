//! # medkg Core
//!
//! Knowledge graph model and loader for auditing disease predictions.
//!
//! A reference ("ground truth") graph links diseases to the factors observed
//! across many patients; a prediction graph links one predicted disease to
//! the factors a model used for one case. This crate provides:
//!
//! - **types** - node types, relationships, nodes and links
//! - **document** - the `{nodes, links}` wire format
//! - **graph** - the validated, petgraph-backed [`KnowledgeGraph`](graph::KnowledgeGraph)
//! - **loader** - loading both graphs into a [`KnowledgeGraphPair`](loader::KnowledgeGraphPair)
//! - **config** - named audit thresholds
//! - **error** - error types
//!
//! ## Quick Start
//!
//! ```rust
//! use medkg_core::prelude::*;
//! use serde_json::json;
//!
//! let ground_truth = json!({
//!     "nodes": [{"id": "Flu", "type": "Disease"}, {"id": "Fever", "type": "Symptom"}],
//!     "links": [{"source": "Flu", "target": "Fever", "relationship": "HAS_SYMPTOM", "weight": 0.9}]
//! });
//! let prediction = json!({
//!     "nodes": [{"id": "Flu", "type": "Disease"}, {"id": "Fever", "type": "Symptom"}],
//!     "links": [{"source": "Flu", "target": "Fever", "relationship": "HAS_SYMPTOM", "weight": 1.0}]
//! });
//!
//! let pair = load(&ground_truth, &prediction).unwrap();
//! assert_eq!(pair.predicted_disease(), Ok("Flu"));
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod graph;
pub mod loader;
pub mod prelude;
pub mod types;

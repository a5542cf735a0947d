//! # medkg Builders
//!
//! Everything that produces or changes the graph documents the analysis
//! consumes:
//!
//! - **reference** - patient records to a ground-truth graph, by frequency
//! - **prediction** - one model answer to a prediction graph, novel symptoms flagged
//! - **vocabulary** - the known-vocabulary text file
//! - **edit** - adding or re-linking diseases in a reference graph
//! - **io** - document, record and vocabulary files
//! - **audit** - build a prediction, load the pair and analyze it in one call
//!
//! ## Quick Start
//!
//! ```rust
//! use medkg_builders::prelude::*;
//! use serde_json::json;
//!
//! let records = vec![
//!     json!({"Disease": "Flu", "Fever": "Yes", "Cough": "No", "Age": 30, "Gender": "Male"}),
//!     json!({"Disease": "Flu", "Fever": "Yes", "Cough": "Yes", "Age": 41, "Gender": "Male"}),
//! ];
//! let reference = build_reference(&records, &ReferenceConfig::default()).unwrap();
//!
//! let answer = json!({"result": [{"predicted disease": "Flu", "Fever": "Yes"}]});
//! let report = audit(&reference, &answer, &Vocabulary::default(), &AuditConfig::default()).unwrap();
//! assert_eq!(report.bundle.reasoning_paths.reasoning_accuracy, 1.0);
//! ```

pub mod audit;
pub mod config;
pub mod edit;
pub mod io;
pub mod prediction;
pub mod prelude;
pub mod reference;
pub mod vocabulary;

pub use audit::{audit, AuditReport, Auditor};

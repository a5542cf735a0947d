//! medkg Builders Prelude - convenient imports for common usage.
//!
//! ```rust
//! use medkg_builders::prelude::*;
//! ```

pub use crate::audit::{audit, AuditReport, Auditor};
pub use crate::config::{age_group_for, default_age_groups, parse_age, AgeGroup, ReferenceConfig};
pub use crate::edit::{ConnectionSpec, EditAction, GraphEdit, DEFAULT_CONNECTION_WEIGHT};
pub use crate::io::{
    read_document, read_graph, read_json, read_json_as, read_records, read_vocabulary, write_document,
    write_json, write_vocabulary,
};
pub use crate::prediction::{build_prediction, build_prediction_from_str};
pub use crate::reference::{
    build_reference, build_reference_from_csv, build_reference_from_str, read_csv_records,
};
pub use crate::vocabulary::{Section, Vocabulary};

// Re-export from analysis (which re-exports core)
pub use medkg_analysis::prelude::*;

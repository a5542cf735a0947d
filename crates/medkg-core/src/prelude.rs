//! medkg Core Prelude - convenient imports for common usage.
//!
//! ```rust
//! use medkg_core::prelude::*;
//! ```

pub use crate::types::{format_weight, Connection, GraphRole, Link, Node, NodeType, Relationship};

pub use crate::document::{Endpoint, GraphDocument, LinkRecord};

pub use crate::graph::KnowledgeGraph;

pub use crate::loader::{load, load_documents, load_str, KnowledgeGraphPair};

pub use crate::config::{
    AuditConfig, CounterfactualConfig, ExplanationConfig, ScoringConfig, ValidationConfig,
    DEFAULT_KEY_SYMPTOMS,
};

pub use crate::error::{
    BuildError, ConfigError, EditError, GraphError, MedkgError, NoPredictionError, Result,
};

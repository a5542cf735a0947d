//! medkg Analysis Prelude - convenient imports for common usage.
//!
//! ```rust
//! use medkg_analysis::prelude::*;
//! ```

// Pipeline
pub use crate::bundle::{AnalysisResultBundle, Stage};
pub use crate::pipeline::{analyze, analyze_with, Analyzer};

// Stage outputs
pub use crate::structural::{Histogram, StructuralComparison};
pub use crate::semantic::{NovelFactor, RelationshipComparison, SemanticComparison};
pub use crate::reasoning::{
    AlternativeDisease, Finding, MissingFactor, ReasoningItem, ReasoningLedger, ReasoningPaths,
};
pub use crate::counterfactual::{
    AlternativeDiagnosis, ChangeAction, Counterfactuals, FactorChange, MinimalChanges,
};
pub use crate::metrics::{Metrics, Reliability};
pub use crate::explain::{Assessment, Explanations, FactorExplanation, MissingFactorExplanation};
pub use crate::visualize::{
    AssessmentData, CombinedGraph, CounterfactualData, ExplanationData, Provenance,
    VisualizationData, VizLink, VizNode,
};

// Re-export from core
pub use medkg_core::prelude::*;

//! CLI command implementations.

pub mod analyze;
pub mod audit;
pub mod build;
pub mod graph;
pub mod init;
pub mod report;
pub mod vocabulary;

//! Build a prediction graph from a model answer and analyze it.

use anyhow::{Context, Result};
use colored::Colorize;
use medkg::prelude::*;
use std::path::Path;

use super::report::print_summary;
use crate::config::Config;

pub fn run(
    answer: &Path,
    graph: Option<&Path>,
    vocabulary: Option<&Path>,
    output: Option<&Path>,
) -> Result<()> {
    let config = Config::load()?;
    let graph_path = config.ground_truth_path(graph);
    let vocabulary_path = config.vocabulary_path(vocabulary);

    let reference = read_document(&graph_path, GraphRole::GroundTruth)
        .with_context(|| format!("Failed to read reference graph {}", graph_path.display()))?;
    let vocabulary = read_vocabulary(&vocabulary_path)
        .with_context(|| format!("Failed to read vocabulary {}", vocabulary_path.display()))?;
    let answer_value = read_json(answer)
        .with_context(|| format!("Failed to read model answer {}", answer.display()))?;

    let report = Auditor::new(config.audit, vocabulary)?
        .with_age_groups(config.reference.age_groups)
        .audit(&reference, &answer_value)
        .context("Audit failed")?;
    print_summary(&report.bundle);

    if let Some(output) = output {
        write_json(output, &report)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        println!("{} Wrote audit report to {}", "✓".green().bold(), output.display().to_string().cyan());
    }
    Ok(())
}

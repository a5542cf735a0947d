//! Build reference and prediction graphs.

use anyhow::{Context, Result};
use colored::Colorize;
use medkg::prelude::*;
use std::path::Path;

use crate::config::Config;

pub fn reference(records: &Path, output: Option<&Path>) -> Result<()> {
    let config = Config::load()?;
    let output = config.ground_truth_path(output);

    println!("{} Reading patient records...", "→".blue());
    let rows = read_records(records).with_context(|| format!("Failed to read {}", records.display()))?;

    let doc = build_reference(&rows, &config.reference)?;
    write_document(&output, &doc).with_context(|| format!("Failed to write {}", output.display()))?;

    let diseases = doc.nodes.iter().filter(|n| n.node_type == NodeType::Disease).count();
    println!();
    println!("{} Built reference graph {}", "✓".green().bold(), output.display().to_string().cyan());
    println!("  Records:  {}", rows.len().to_string().cyan());
    println!("  Diseases: {}", diseases.to_string().cyan());
    println!("  Nodes:    {}", doc.nodes.len().to_string().cyan());
    println!("  Links:    {}", doc.links.len().to_string().cyan());
    Ok(())
}

pub fn prediction(answer: &Path, output: &Path, vocabulary: Option<&Path>) -> Result<()> {
    let config = Config::load()?;
    let vocabulary_path = config.vocabulary_path(vocabulary);
    let vocabulary = read_vocabulary(&vocabulary_path)
        .with_context(|| format!("Failed to read vocabulary {}", vocabulary_path.display()))?;

    let value = read_json(answer).with_context(|| format!("Failed to read {}", answer.display()))?;
    let doc = build_prediction(&value, &vocabulary, &config.reference.age_groups)?;
    write_document(output, &doc).with_context(|| format!("Failed to write {}", output.display()))?;

    println!("{} Built prediction graph {}", "✓".green().bold(), output.display().to_string().cyan());
    println!("  Links:          {}", doc.links.len().to_string().cyan());
    let novel: Vec<&str> = doc.nodes.iter().filter(|n| n.is_novel).map(|n| n.id.as_str()).collect();
    if !novel.is_empty() {
        println!("  Novel symptoms: {}", novel.join(", ").yellow());
    }
    Ok(())
}

//! Manage the vocabulary file.

use anyhow::{Context, Result};
use colored::Colorize;
use medkg::prelude::*;
use std::path::Path;

use crate::config::Config;

pub fn sync(graph: Option<&Path>, vocabulary: Option<&Path>) -> Result<()> {
    let config = Config::load()?;
    let graph_path = config.ground_truth_path(graph);
    let vocabulary_path = config.vocabulary_path(vocabulary);

    let graph = read_graph(&graph_path, GraphRole::GroundTruth)
        .with_context(|| format!("Failed to load {}", graph_path.display()))?;
    let mut vocab = read_vocabulary(&vocabulary_path)?;
    vocab.sync(&graph);
    write_vocabulary(&vocabulary_path, &vocab)
        .with_context(|| format!("Failed to write {}", vocabulary_path.display()))?;

    println!("{} Synced {}", "✓".green().bold(), vocabulary_path.display().to_string().cyan());
    println!("  Diseases: {}", vocab.diseases().len().to_string().cyan());
    println!("  Symptoms: {}", vocab.symptoms().len().to_string().cyan());
    Ok(())
}

pub fn show(vocabulary: Option<&Path>) -> Result<()> {
    let config = Config::load()?;
    let path = config.vocabulary_path(vocabulary);
    let vocab = read_vocabulary(&path)?;

    for section in Section::ALL {
        let entries = vocab.entries(section);
        if section == Section::Symptoms && entries.is_empty() {
            println!("{}: {} {}", section.to_string().blue().bold(), vocab.known_symptoms().join(", "), "(default)".dimmed());
            continue;
        }
        if !entries.is_empty() {
            println!("{}: {}", section.to_string().blue().bold(), entries.join(", "));
        }
    }
    Ok(())
}

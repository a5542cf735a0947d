//! Queries and edits on the reference graph.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use medkg::prelude::*;
use std::path::Path;

use crate::config::Config;

fn load_reference(graph: Option<&Path>) -> Result<KnowledgeGraph> {
    let config = Config::load()?;
    let path = config.ground_truth_path(graph);
    if !path.exists() {
        bail!(
            "No reference graph at {}. Run {} first.",
            path.display(),
            "medkg build-reference".cyan()
        );
    }
    read_graph(&path, GraphRole::GroundTruth)
        .with_context(|| format!("Failed to load {}", path.display()))
}

pub fn diseases(graph: Option<&Path>) -> Result<()> {
    let graph = load_reference(graph)?;
    let diseases = graph.disease_ids();
    println!("{} ({})", "Diseases".blue().bold(), diseases.len());
    for disease in diseases {
        println!("  {}", disease);
    }
    Ok(())
}

pub fn disease(name: &str, graph: Option<&Path>) -> Result<()> {
    let graph = load_reference(graph)?;
    let Some(connections) = graph.connections(name) else {
        bail!("Disease '{}' not found", name);
    };

    println!("{}", name.cyan().bold());
    if connections.is_empty() {
        println!("  {}", "no connections".dimmed());
    }
    for conn in connections {
        println!("  {:<24} {:<28} {:.2}", conn.relationship.to_string(), conn.target, conn.weight);
    }
    Ok(())
}

pub fn symptoms(graph: Option<&Path>) -> Result<()> {
    let graph = load_reference(graph)?;
    let custom = graph.custom_symptom_ids();
    let symptoms = graph.symptom_ids();

    println!("{} ({}, {} custom)", "Symptoms".blue().bold(), symptoms.len(), custom.len());
    for symptom in symptoms {
        if custom.contains(&symptom) {
            println!("  {} {}", symptom, "(custom)".yellow());
        } else {
            println!("  {}", symptom);
        }
    }
    Ok(())
}

pub fn update(edit: &Path, graph: Option<&Path>) -> Result<()> {
    let config = Config::load()?;
    let path = config.ground_truth_path(graph);

    let request: GraphEdit = read_json_as(edit)
        .with_context(|| format!("Failed to read edit request {}", edit.display()))?;
    let mut doc = read_document(&path, GraphRole::GroundTruth)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    request.apply(&mut doc)?;
    write_document(&path, &doc).with_context(|| format!("Failed to write {}", path.display()))?;

    let verb = match request.action {
        EditAction::Add => "Added",
        EditAction::Modify => "Updated",
    };
    println!(
        "{} {} {} with {} connection(s)",
        "✓".green().bold(),
        verb,
        request.disease.cyan(),
        request.connections.len()
    );
    println!("  Run {} to refresh the vocabulary.", "medkg vocabulary sync".cyan());
    Ok(())
}

//! Analyze a prediction graph against a reference graph.

use anyhow::{Context, Result};
use colored::Colorize;
use medkg::prelude::*;
use std::path::Path;

use super::report::print_summary;
use crate::config::Config;

pub fn run(ground_truth: &Path, prediction: &Path, output: Option<&Path>, json: bool) -> Result<()> {
    let config = Config::load()?;

    let ground_truth_json = std::fs::read_to_string(ground_truth)
        .with_context(|| format!("Failed to read {}", ground_truth.display()))?;
    let prediction_json = std::fs::read_to_string(prediction)
        .with_context(|| format!("Failed to read {}", prediction.display()))?;
    let pair = load_str(&ground_truth_json, &prediction_json).context("Failed to load graphs")?;

    let bundle = Analyzer::new(config.audit).analyze(&pair);
    if json {
        println!("{}", serde_json::to_string_pretty(&bundle)?);
        return Ok(());
    }
    print_summary(&bundle);

    if let Some(output) = output {
        write_json(output, &bundle)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        println!("{} Wrote result bundle to {}", "✓".green().bold(), output.display().to_string().cyan());
    }
    Ok(())
}

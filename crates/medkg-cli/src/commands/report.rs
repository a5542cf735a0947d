//! Terminal rendering of a result bundle.

use colored::{ColoredString, Colorize};
use medkg::prelude::*;

pub fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

fn reliability_label(reliability: Reliability) -> ColoredString {
    match reliability {
        Reliability::High => reliability.as_str().green().bold(),
        Reliability::Medium => reliability.as_str().yellow().bold(),
        Reliability::Low => reliability.as_str().red().bold(),
    }
}

fn assessment_label(assessment: Option<Assessment>) -> ColoredString {
    match assessment {
        Some(Assessment::StrongMatch) => Assessment::StrongMatch.as_str().green().bold(),
        Some(Assessment::PartialMatch) => Assessment::PartialMatch.as_str().yellow().bold(),
        Some(other) => other.as_str().red().bold(),
        None => "UNKNOWN".dimmed(),
    }
}

/// Print the metric summary and the main findings.
pub fn print_summary(bundle: &AnalysisResultBundle) {
    let disease = bundle.predicted_disease.as_deref().unwrap_or("<none>");

    println!("{}", "medkg Audit".white().bold());
    println!("{}", "═".repeat(40).dimmed());
    println!();
    println!("  Predicted disease:  {}", disease.cyan().bold());

    if let Some(error) = &bundle.metrics.error {
        println!("  {} {}", "✗".red(), error);
        return;
    }
    if let Some(note) = &bundle.semantic_comparison.explanation {
        println!("  {} {}", "!".yellow(), note);
    }
    println!();

    let metrics = &bundle.metrics;
    println!("{}", "Metrics".blue().bold());
    println!("  Reasoning accuracy: {}", percent(metrics.reasoning_accuracy).cyan());
    println!("  Semantic similarity: {}", percent(metrics.semantic_similarity).cyan());
    println!("  Factor coverage:    {}", percent(metrics.factor_coverage).cyan());
    println!("  Novelty:            {}", percent(metrics.combined_novelty).cyan());
    println!("  Confidence:         {}", percent(metrics.confidence_score).cyan().bold());
    println!("  Reliability:        {}", reliability_label(metrics.reliability));
    println!("  Assessment:         {}", assessment_label(bundle.explanations.assessment));
    println!();

    let paths = &bundle.reasoning_paths;
    println!("{}", "Reasoning".blue().bold());
    println!("  Valid:              {}", paths.valid_reasoning.len().to_string().green());
    println!("  Invalid:            {}", paths.invalid_reasoning.len().to_string().red());
    println!("  Novel:              {}", paths.novel_reasoning.len().to_string().yellow());
    println!("  Missing important:  {}", paths.missing_important_factors.len().to_string().yellow());

    for item in &paths.invalid_reasoning {
        println!("    {} {} {} ({})", "✗".red(), item.relationship, item.factor, item.evidence.dimmed());
    }
    for missing in &paths.missing_important_factors {
        let marker = if missing.is_key_symptom { " key symptom" } else { "" };
        println!(
            "    {} {} {} (weight {:.2}{})",
            "?".yellow(),
            missing.relationship,
            missing.factor,
            missing.weight,
            marker
        );
    }

    let alternatives = &bundle.counterfactuals.alternative_diagnoses;
    if !alternatives.is_empty() {
        println!();
        println!("{}", "Closest alternatives".blue().bold());
        for alt in alternatives {
            println!(
                "  {:<20} similarity {}  (+{} / -{})",
                alt.alternative_disease,
                percent(alt.similarity).cyan(),
                alt.additions().count(),
                alt.removals().count()
            );
        }
    }

    println!();
    println!("{}", "═".repeat(40).dimmed());
}

//! medkg CLI - audit disease predictions against a reference knowledge graph.

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "medkg")]
#[command(author, version, about = "medkg - Audit AI disease predictions against a knowledge graph", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default medkg.toml
    Init {
        /// Project directory (default: current directory)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Analyze a prediction graph against a reference graph
    Analyze {
        /// Reference (ground truth) graph document
        ground_truth: PathBuf,

        /// Prediction graph document
        prediction: PathBuf,

        /// Write the full result bundle as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the result bundle as JSON instead of the summary
        #[arg(long)]
        json: bool,
    },

    /// Build a prediction graph from a model answer and analyze it
    Audit {
        /// Model answer: {"result": [{...}]}
        answer: PathBuf,

        /// Reference graph (default: paths.ground_truth)
        #[arg(short, long)]
        graph: Option<PathBuf>,

        /// Vocabulary file (default: paths.vocabulary)
        #[arg(long)]
        vocabulary: Option<PathBuf>,

        /// Write the prediction graph and result bundle as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build a reference graph from patient records
    BuildReference {
        /// Patient records: a .csv file with a header row, or a JSON array of rows
        records: PathBuf,

        /// Output graph (default: paths.ground_truth)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build a prediction graph from a model answer
    BuildPrediction {
        /// Model answer: {"result": [{...}]}
        answer: PathBuf,

        /// Output graph document
        #[arg(short, long, default_value = "prediction_graph.json")]
        output: PathBuf,

        /// Vocabulary file (default: paths.vocabulary)
        #[arg(long)]
        vocabulary: Option<PathBuf>,
    },

    /// List the diseases of the reference graph
    Diseases {
        #[arg(short, long)]
        graph: Option<PathBuf>,
    },

    /// Show one disease's connections
    Disease {
        name: String,

        #[arg(short, long)]
        graph: Option<PathBuf>,
    },

    /// List symptoms, marking hand-added ones
    Symptoms {
        #[arg(short, long)]
        graph: Option<PathBuf>,
    },

    /// Add a disease or replace its connections
    UpdateGraph {
        /// Edit request: {"disease", "action": "add"|"modify", "connections": [...]}
        edit: PathBuf,

        #[arg(short, long)]
        graph: Option<PathBuf>,
    },

    /// Manage the vocabulary file
    Vocabulary {
        #[command(subcommand)]
        command: VocabularyCommands,
    },
}

#[derive(Subcommand)]
enum VocabularyCommands {
    /// Replace the disease and symptom lists with the reference graph's
    Sync {
        #[arg(short, long)]
        graph: Option<PathBuf>,

        #[arg(long)]
        vocabulary: Option<PathBuf>,
    },

    /// Print the known vocabulary
    Show {
        #[arg(long)]
        vocabulary: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Init { path } => commands::init::run(path),
        Commands::Analyze { ground_truth, prediction, output, json } => {
            commands::analyze::run(&ground_truth, &prediction, output.as_deref(), json)
        }
        Commands::Audit { answer, graph, vocabulary, output } => commands::audit::run(
            &answer,
            graph.as_deref(),
            vocabulary.as_deref(),
            output.as_deref(),
        ),
        Commands::BuildReference { records, output } => {
            commands::build::reference(&records, output.as_deref())
        }
        Commands::BuildPrediction { answer, output, vocabulary } => {
            commands::build::prediction(&answer, &output, vocabulary.as_deref())
        }
        Commands::Diseases { graph } => commands::graph::diseases(graph.as_deref()),
        Commands::Disease { name, graph } => commands::graph::disease(&name, graph.as_deref()),
        Commands::Symptoms { graph } => commands::graph::symptoms(graph.as_deref()),
        Commands::UpdateGraph { edit, graph } => commands::graph::update(&edit, graph.as_deref()),
        Commands::Vocabulary { command } => match command {
            VocabularyCommands::Sync { graph, vocabulary } => {
                commands::vocabulary::sync(graph.as_deref(), vocabulary.as_deref())
            }
            VocabularyCommands::Show { vocabulary } => {
                commands::vocabulary::show(vocabulary.as_deref())
            }
        },
    }
}

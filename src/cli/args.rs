//! Command line argument parsing for the NutriScan CLI using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// NutriScan - nutrition analysis for packaged food products
#[derive(Parser, Debug, Clone)]
#[command(name = "nutriscan")]
#[command(about = "Diet classification and health scoring for packaged food products")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct NutriScanArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl NutriScanArgs {
    /// Get the effective verbosity level.
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Output format for command results.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Human,
    /// JSON
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Train a health-score model from a reference dataset
    Train(TrainArgs),

    /// Analyze a single product
    Analyze(AnalyzeArgs),

    /// Compare two or more products
    Compare(CompareArgs),
}

/// Arguments for training a model
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// Path to the reference dataset CSV
    #[arg(short, long, value_name = "CSV_FILE")]
    pub data: PathBuf,

    /// Output path for the trained model artifact
    #[arg(short, long, value_name = "ARTIFACT_FILE")]
    pub model: PathBuf,

    /// Number of trees in the forest
    #[arg(long, value_name = "N")]
    pub trees: Option<usize>,

    /// Held-out evaluation fraction
    #[arg(long, value_name = "FRACTION")]
    pub test_split: Option<f64>,

    /// Load at most N dataset rows (smoke runs)
    #[arg(long, value_name = "N")]
    pub sample: Option<usize>,
}

/// Arguments for analyzing a product
#[derive(Parser, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Path to a trained model artifact (scoring is skipped if absent)
    #[arg(short, long, value_name = "ARTIFACT_FILE")]
    pub model: PathBuf,

    /// Product name
    #[arg(long, default_value = "")]
    pub name: String,

    /// Ingredient list text
    #[arg(long, default_value = "")]
    pub ingredients: String,

    /// Product categories text
    #[arg(long, default_value = "")]
    pub categories: String,

    /// Sparse nutrition facts as JSON, e.g. '{"Calories":165,"Protein":31}'
    #[arg(long, value_name = "JSON")]
    pub nutrition: Option<String>,

    /// Apply Jain dietary restrictions
    #[arg(long)]
    pub jain: bool,
}

/// Arguments for comparing products
#[derive(Parser, Debug, Clone)]
pub struct CompareArgs {
    /// Path to a trained model artifact (scoring is skipped if absent)
    #[arg(short, long, value_name = "ARTIFACT_FILE")]
    pub model: PathBuf,

    /// JSON file with an array of product inputs
    #[arg(short, long, value_name = "JSON_FILE")]
    pub products: PathBuf,
}

//! Command implementations for the NutriScan CLI.

use std::fs;

use crate::analyzer::{NutriAnalyzer, ProductInput};
use crate::cli::args::{AnalyzeArgs, Command, CompareArgs, NutriScanArgs, TrainArgs};
use crate::cli::output::{output_result, print_analysis, print_comparison, print_training_report};
use crate::error::Result;
use crate::nutrition::facts::NutritionFacts;
use crate::scoring::dataset::ReferenceDataset;
use crate::scoring::model::{HealthScoreModel, ModelConfig};

/// Execute a CLI command.
pub fn execute_command(args: NutriScanArgs) -> Result<()> {
    match &args.command {
        Command::Train(train_args) => train(train_args.clone(), &args),
        Command::Analyze(analyze_args) => analyze(analyze_args.clone(), &args),
        Command::Compare(compare_args) => compare(compare_args.clone(), &args),
    }
}

/// Train a model and persist the artifact.
fn train(args: TrainArgs, cli_args: &NutriScanArgs) -> Result<()> {
    if cli_args.verbosity() > 0 {
        println!("Loading reference data from {}...", args.data.display());
    }
    let dataset = match args.sample {
        Some(limit) => ReferenceDataset::load_csv_sample(&args.data, limit)?,
        None => ReferenceDataset::load_csv(&args.data)?,
    };
    if cli_args.verbosity() > 0 {
        println!(
            "Loaded {} rows ({} with complete nutrition data)",
            dataset.len(),
            dataset.complete_len()
        );
    }

    let mut config = ModelConfig::default();
    if let Some(trees) = args.trees {
        config.n_trees = trees;
    }
    if let Some(test_split) = args.test_split {
        config.test_split = test_split;
    }

    let mut model = HealthScoreModel::new(config);
    let report = model.train(&dataset)?;
    model.save(&args.model)?;

    print_training_report(&report, cli_args);
    if cli_args.verbosity() > 0 {
        println!("Model saved to {}", args.model.display());
    }
    output_result("Training complete", &report, cli_args)
}

/// Analyze a single product.
fn analyze(args: AnalyzeArgs, cli_args: &NutriScanArgs) -> Result<()> {
    let analyzer = NutriAnalyzer::with_artifact(&args.model)?;
    if !analyzer.can_score() && cli_args.verbosity() > 1 {
        eprintln!("Warning: no trained model available, health scoring disabled");
    }

    let nutrition = match &args.nutrition {
        Some(json) => serde_json::from_str::<NutritionFacts>(json)?,
        None => NutritionFacts::new(),
    };
    let input = ProductInput {
        name: args.name,
        ingredients: args.ingredients,
        categories: args.categories,
        nutrition,
        jain_mode: args.jain,
    };

    let result = analyzer.analyze(&input);
    print_analysis(&result, cli_args);
    output_result("Analysis complete", &result, cli_args)
}

/// Compare a batch of products.
fn compare(args: CompareArgs, cli_args: &NutriScanArgs) -> Result<()> {
    let analyzer = NutriAnalyzer::with_artifact(&args.model)?;

    let content = fs::read_to_string(&args.products)?;
    let inputs: Vec<ProductInput> = serde_json::from_str(&content)?;

    let result = analyzer.compare(&inputs)?;
    print_comparison(&result, cli_args);
    output_result("Comparison complete", &result, cli_args)
}

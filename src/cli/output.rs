//! Output helpers for the NutriScan CLI.

use serde::Serialize;

use crate::analyzer::{AnalysisResult, ComparisonResult};
use crate::cli::args::{NutriScanArgs, OutputFormat};
use crate::error::Result;
use crate::scoring::model::TrainingReport;

/// Print a serializable value in the requested output format.
pub fn output_result<T: Serialize>(title: &str, value: &T, args: &NutriScanArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Json => {
            let json = if args.pretty {
                serde_json::to_string_pretty(value)?
            } else {
                serde_json::to_string(value)?
            };
            println!("{json}");
        }
        OutputFormat::Human => {
            if args.verbosity() > 0 {
                println!("{title}");
            }
        }
    }
    Ok(())
}

/// Render a training report for human consumption.
pub fn print_training_report(report: &TrainingReport, args: &NutriScanArgs) {
    if args.output_format == OutputFormat::Json || args.verbosity() == 0 {
        return;
    }
    println!("Model performance:");
    println!("  R² score: {:.3}", report.r2);
    println!("  RMSE:     {:.3}", report.rmse);
    println!("  Training rows: {}", report.training_rows);
    println!("  Held-out rows: {}", report.test_rows);
    println!("Feature importance:");
    for item in &report.feature_importance {
        println!("  {:<14} {:.4}", item.attribute.name(), item.importance);
    }
}

/// Render an analysis result for human consumption.
pub fn print_analysis(result: &AnalysisResult, args: &NutriScanArgs) {
    if args.output_format == OutputFormat::Json || args.verbosity() == 0 {
        return;
    }
    if !result.product_name.is_empty() {
        println!("Product: {}", result.product_name);
    }
    println!(
        "Diet: {} (confidence {:.0}%)",
        result.diet.label,
        result.diet.confidence * 100.0
    );
    if args.verbosity() > 1 {
        println!("  Reason: {}", result.diet.reason);
    }
    match result.health.score {
        Some(score) => println!("Health score: {score:.1}/100 ({})", result.health.rating),
        None => println!("Health score: unavailable ({})", result.health.rating),
    }
    if !result.suggestions.is_empty() {
        println!("Suggestions:");
        for suggestion in &result.suggestions {
            println!("  - {suggestion}");
        }
    }
}

/// Render a comparison result for human consumption.
pub fn print_comparison(result: &ComparisonResult, args: &NutriScanArgs) {
    if args.output_format == OutputFormat::Json || args.verbosity() == 0 {
        return;
    }
    for (i, product) in result.products.iter().enumerate() {
        println!("--- Product {} ---", i + 1);
        print_analysis(product, args);
    }
    match &result.winner {
        Some(winner) => {
            let name = if winner.product_name.is_empty() {
                "(unnamed)"
            } else {
                &winner.product_name
            };
            println!("Winner: {name}");
        }
        None => println!("Winner: none (no product has a health score)"),
    }
}

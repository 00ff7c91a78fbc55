//! NutriScan CLI binary.

use clap::Parser;
use nutriscan::cli::args::NutriScanArgs;
use nutriscan::cli::commands::execute_command;
use std::process;

fn main() {
    let args = NutriScanArgs::parse();

    if let Err(e) = execute_command(args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

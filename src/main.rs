//! Main entry point for the repldiff CLI

use clap::{CommandFactory, Parser};
use repldiff::cli::{Cli, Config};
use repldiff::commands::{run_check, CheckOutcome};

fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging; --debug raises the filter
    env_logger::Builder::from_default_env()
        .filter_level(if cli.debug {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    // Validate options collectively before touching any data store
    let config = match Config::from_cli(cli) {
        Ok(config) => config,
        Err(errors) => {
            for error in &errors {
                eprintln!("{}", error);
            }
            eprintln!();
            let _ = Cli::command().print_help();
            std::process::exit(8);
        }
    };

    // Run the comparison
    match run_check(&config) {
        Ok(CheckOutcome::InSync) => {}
        Ok(CheckOutcome::DifferencesFound) => std::process::exit(8),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

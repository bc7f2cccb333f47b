//! quay CLI - Feature-conditional dependency and compatibility resolver

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use quay::core::feature::FeatureError;
use quay::core::settings::SettingsError;
use quay::resolver::ValidationError;
use quay::util::diagnostic::emit;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color && std::io::stderr().is_terminal();

    if let Err(e) = run(cli) {
        report(&e, color);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("quay=debug")
    } else {
        EnvFilter::new("quay=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let global = commands::GlobalArgs::from(&cli);

    // Execute command
    match cli.command {
        Commands::Resolve(args) => commands::resolve::execute(&global, args),
        Commands::Validate(args) => commands::validate::execute(&global, args),
        Commands::Options => commands::options::execute(&global),
        Commands::Plan(args) => commands::plan::execute(&global, args),
        Commands::Metadata(args) => commands::metadata::execute(&global, args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

/// Print an error, using the structured diagnostic when there is one.
fn report(e: &anyhow::Error, color: bool) {
    if let Some(err) = e.downcast_ref::<ValidationError>() {
        emit(&err.to_diagnostic(), color);
    } else if let Some(err) = e.downcast_ref::<FeatureError>() {
        emit(&err.to_diagnostic(), color);
    } else if let Some(err) = e.downcast_ref::<SettingsError>() {
        emit(&err.to_diagnostic(), color);
    } else {
        eprintln!("error: {:#}", e);
    }
}

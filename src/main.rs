//! rulekit - preset and rule installer for AI coding agents
//!
//! Installs a resolved bundle of agent presets and rules into a project, a
//! platform's global configuration directory or a custom directory, without
//! ever silently overwriting local edits.

use clap::Parser;
use miette::Diagnostic;

mod bundle;
mod cli;
mod commands;
mod config;
mod error;
mod hash;
mod installer;
mod logging;
mod platform;
mod transaction;
mod ui;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.debug);

    tracing::debug!("rulekit starting with args: {:?}", cli);

    let result = match cli.command {
        Commands::Install(args) => commands::install::run(cli.workspace, args, cli.verbose),
        Commands::Platforms => commands::platforms::run(),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        if let Some(help) = e.help() {
            eprintln!("Hint: {}", help);
        }
        std::process::exit(1);
    }
}

//! Netprint CLI - manage the device records of a network printer/scanner store.
//!
//! Wraps the vendor configuration tool so device records can be listed,
//! added, edited and removed from scripts or through an interactive form.

mod cli;
mod commands;
mod error;
mod output;
mod prompt;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use error::{exit_codes, CliError};
use output::get_formatter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let json = cli.json;
    match run(cli) {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            eprintln!("{}", get_formatter(json).format_failure(&e));
            std::process::exit(e.exit_code());
        }
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let settings = commands::resolve_settings(&cli)?;
    tracing::debug!(tool = %settings.tool.display(), prefix = %settings.node_prefix, "resolved settings");

    match cli.command {
        Commands::List => commands::run_list(&settings, cli.json),
        Commands::Models => commands::run_models(&settings, cli.json),
        Commands::Add(args) => commands::run_add(args, &settings, cli.json),
        Commands::Edit(args) => commands::run_edit(args, &settings, cli.json),
        Commands::Remove(args) => commands::run_remove(args, &settings, cli.json),
        Commands::Form => commands::run_form(&settings),
        Commands::Settings(args) => commands::run_settings(args, &settings, cli.json),
    }
}

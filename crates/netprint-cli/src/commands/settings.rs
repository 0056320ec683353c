//! Settings commands implementation.

use netprint_core::settings::{Settings, SettingsStore};

use crate::cli::{SettingsArgs, SettingsCommands, SettingsSetArgs};
use crate::error::CliError;
use crate::output::get_formatter;

/// Run the settings command
///
/// `effective` already has the command-line overrides applied; `set` only
/// writes what was passed to it.
pub fn run_settings(args: SettingsArgs, effective: &Settings, json: bool) -> Result<(), CliError> {
    match args.command {
        SettingsCommands::Show => run_show(effective, json),
        SettingsCommands::Set(set) => {
            let store = SettingsStore::open_default()?;
            run_set(&store, set, json)
        }
    }
}

fn run_show(settings: &Settings, json: bool) -> Result<(), CliError> {
    let formatter = get_formatter(json);
    let path = SettingsStore::open_default()
        .ok()
        .map(|s| s.path().display().to_string());

    println!("{}", formatter.format_settings(settings, path.as_deref()));
    Ok(())
}

fn run_set(store: &SettingsStore, args: SettingsSetArgs, json: bool) -> Result<(), CliError> {
    let formatter = get_formatter(json);
    let settings = apply_set(store.load()?, args)?;
    store.save(&settings)?;
    tracing::info!(path = %store.path().display(), "settings saved");

    println!(
        "{}",
        formatter.format_settings(&settings, Some(&store.path().display().to_string()))
    );
    Ok(())
}

fn apply_set(mut settings: Settings, args: SettingsSetArgs) -> Result<Settings, CliError> {
    if args.tool_path.is_none() && args.prefix.is_none() {
        return Err(CliError::InvalidArgument(
            "Nothing to change: pass --tool-path or --prefix".to_string(),
        ));
    }

    if let Some(tool) = args.tool_path {
        if tool.as_os_str().is_empty() {
            return Err(CliError::InvalidArgument(
                "Tool path cannot be empty".to_string(),
            ));
        }
        settings.tool = tool;
    }
    if let Some(prefix) = args.prefix {
        if prefix.chars().any(char::is_whitespace) {
            return Err(CliError::InvalidArgument(
                "Node prefix cannot contain whitespace".to_string(),
            ));
        }
        settings.node_prefix = prefix;
    }

    Ok(settings)
}

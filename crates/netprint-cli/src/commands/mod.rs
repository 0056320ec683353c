//! Command implementations.

pub mod devices;
pub mod form;
pub mod settings;

pub use devices::{run_add, run_edit, run_list, run_models, run_remove};
pub use form::run_form;
pub use settings::run_settings;

use netprint_core::session::EditSession;
use netprint_core::settings::{Settings, SettingsStore};
use netprint_core::store::ToolStore;

use crate::cli::Cli;
use crate::error::CliError;

/// Settings from the settings file with command-line overrides applied.
pub fn resolve_settings(cli: &Cli) -> Result<Settings, CliError> {
    let mut settings = match SettingsStore::open_default() {
        Ok(store) => store.load()?,
        Err(e) => {
            tracing::warn!(error = %e, "settings unavailable, using defaults");
            Settings::default()
        }
    };

    if let Some(tool) = &cli.tool {
        settings.tool = tool.clone();
    }
    if let Some(prefix) = &cli.node_prefix {
        settings.node_prefix = prefix.clone();
    }

    Ok(settings)
}

/// Query the store and open an edit session over it.
pub fn open_session(settings: &Settings) -> Result<EditSession<ToolStore>, CliError> {
    let session = EditSession::open(settings.tool_store(), settings.report_parser())?;
    tracing::debug!(devices = session.registry().len(), "session opened");
    Ok(session)
}

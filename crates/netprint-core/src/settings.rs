//! Persisted settings.
//!
//! Provides file-based storage for the tool location and node-name prefix.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::protocol::commands::DEFAULT_NODE_PREFIX;
use crate::protocol::report::ReportParser;
use crate::store::tool::{ToolStore, DEFAULT_TOOL};

const SETTINGS_FILE: &str = "settings.json";

/// How to reach the device store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Store tool executable (bare names are resolved through `PATH`)
    pub tool: PathBuf,
    /// Prefix the store puts in front of node names
    pub node_prefix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tool: PathBuf::from(DEFAULT_TOOL),
            node_prefix: DEFAULT_NODE_PREFIX.to_string(),
        }
    }
}

impl Settings {
    pub fn tool_store(&self) -> ToolStore {
        ToolStore::new(&self.tool).with_node_prefix(&self.node_prefix)
    }

    pub fn report_parser(&self) -> ReportParser {
        ReportParser::with_node_prefix(&self.node_prefix)
    }
}

/// Settings storage service.
///
/// Takes a `PathBuf` in the constructor so callers and tests can provide
/// the storage location.
pub struct SettingsStore {
    dir: PathBuf,
}

impl SettingsStore {
    /// Create a new SettingsStore with the given directory.
    pub fn new(dir: PathBuf) -> Result<Self, SettingsError> {
        fs::create_dir_all(&dir).map_err(|e| {
            SettingsError::DirectoryAccess(format!("{}: {}", dir.display(), e))
        })?;
        Ok(Self { dir })
    }

    /// Open the store in the platform config directory.
    pub fn open_default() -> Result<Self, SettingsError> {
        let dir = default_config_dir().ok_or_else(|| {
            SettingsError::DirectoryAccess("could not determine config directory".to_string())
        })?;
        Self::new(dir)
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(SETTINGS_FILE)
    }

    /// Load settings; a missing file yields the defaults.
    pub fn load(&self) -> Result<Settings, SettingsError> {
        let path = self.path();
        if !path.exists() {
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(&path)?;
        let settings = serde_json::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    pub fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        let content = serde_json::to_string_pretty(settings)?;
        fs::write(self.path(), content)?;
        Ok(())
    }
}

/// Get the default config directory for netprint.
///
/// Uses the `directories` crate to find the appropriate platform-specific
/// config directory.
pub fn default_config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "netprint", "netprint")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

//! Process-backed store that shells out to the configuration tool.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crate::error::StoreError;
use crate::protocol::commands::{Commands, DEFAULT_NODE_PREFIX};
use crate::protocol::response::{check_query_response, check_silent_response, is_usage_text};
use crate::types::DeviceRecord;

use super::DeviceStore;

/// Default store tool name, resolved through `PATH`
pub const DEFAULT_TOOL: &str = "brsaneconfig3";

/// Device store backed by the external configuration tool.
#[derive(Debug, Clone)]
pub struct ToolStore {
    tool: PathBuf,
    node_prefix: String,
}

impl ToolStore {
    pub fn new(tool: impl Into<PathBuf>) -> Self {
        Self {
            tool: tool.into(),
            node_prefix: DEFAULT_NODE_PREFIX.to_string(),
        }
    }

    /// Set the prefix the tool expects in front of node names.
    pub fn with_node_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.node_prefix = prefix.into();
        self
    }

    pub fn tool(&self) -> &Path {
        &self.tool
    }

    pub fn node_prefix(&self) -> &str {
        &self.node_prefix
    }

    fn run(&self, args: &[String]) -> Result<Output, StoreError> {
        tracing::debug!(tool = %self.tool.display(), ?args, "running store tool");

        Command::new(&self.tool)
            .args(args)
            .output()
            .map_err(|source| StoreError::Unavailable {
                tool: self.tool.display().to_string(),
                source,
            })
    }

    /// Run an operation that prints nothing when it succeeds.
    fn run_silent(&self, operation: &str, args: &[String]) -> Result<(), StoreError> {
        let output = self.run(args)?;
        let text = combined_output(&output);

        if is_usage_text(&text) {
            return Err(StoreError::rejected(
                operation,
                "tool printed usage text instead of performing the operation",
            ));
        }

        if !output.status.success() {
            return Err(StoreError::rejected(
                operation,
                failure_message(&output.status.to_string(), &text),
            ));
        }

        check_silent_response(operation, &text)
    }
}

impl Default for ToolStore {
    fn default() -> Self {
        Self::new(DEFAULT_TOOL)
    }
}

impl DeviceStore for ToolStore {
    fn list(&mut self) -> Result<Vec<String>, StoreError> {
        let output = self.run(&Commands::query())?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

        if !output.status.success() {
            return Err(StoreError::rejected(
                "query",
                failure_message(&output.status.to_string(), &combined_output(&output)),
            ));
        }

        let text = combined_output(&output);
        check_query_response(&text)?;

        if stdout.trim().is_empty() && !text.trim().is_empty() {
            return Err(StoreError::rejected("query", text.trim()));
        }

        Ok(stdout.lines().map(str::to_string).collect())
    }

    fn add(&mut self, record: &DeviceRecord) -> Result<(), StoreError> {
        self.run_silent("add", &Commands::add(record, &self.node_prefix))?;
        tracing::info!(name = %record.name, model = %record.model, address = %record.address, "device added");
        Ok(())
    }

    fn remove(&mut self, name: &str) -> Result<(), StoreError> {
        self.run_silent("remove", &Commands::remove(name))?;
        tracing::info!(name, "device removed");
        Ok(())
    }
}

fn combined_output(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&stderr);
    }
    text
}

fn failure_message(status: &str, text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        format!("tool exited with {}", status)
    } else {
        format!("tool exited with {}: {}", status, text)
    }
}

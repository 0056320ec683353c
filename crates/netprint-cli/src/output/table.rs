//! Table-formatted output for CLI.

use colored::*;
use comfy_table::{Cell, ContentArrangement, Table};

use netprint_core::error::ValidationError;
use netprint_core::settings::Settings;
use netprint_core::DeviceRecord;

use super::OutputFormatter;

pub struct TableOutput;

impl TableOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TableOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TableOutput {
    fn format_devices(&self, devices: &[DeviceRecord]) -> String {
        if devices.is_empty() {
            return "No devices configured.".to_string();
        }

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["ID", "Name", "Model", "Kind", "Address"]);

        for device in devices {
            table.add_row(vec![
                Cell::new(device.id.as_deref().unwrap_or("-")),
                Cell::new(&device.name),
                Cell::new(&device.model),
                Cell::new(device.address_kind().display_name()),
                Cell::new(device.address.to_string()),
            ]);
        }

        format!("{}\n\n{} device(s)", table, devices.len())
    }

    fn format_device(&self, device: &DeviceRecord) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Device: {}", device.name));
        lines.push(format!("  Model:    {}", device.model));
        lines.push(format!(
            "  {:<8}  {}",
            format!("{}:", device.address_kind().display_name()),
            device.address
        ));
        if let Some(id) = &device.id {
            lines.push(format!("  ID:       {}", id));
        }

        lines.join("\n")
    }

    fn format_models(&self, models: &[String]) -> String {
        if models.is_empty() {
            return "No supported models reported.".to_string();
        }

        let mut lines: Vec<String> = models.iter().map(|m| format!("  {}", m)).collect();
        lines.insert(0, "Supported models:".to_string());
        lines.push(format!("\n{} model(s)", models.len()));
        lines.join("\n")
    }

    fn format_settings(&self, settings: &Settings, path: Option<&str>) -> String {
        let mut lines = vec![
            format!("Tool:         {}", settings.tool.display()),
            format!("Node prefix:  {}", settings.node_prefix),
        ];
        if let Some(path) = path {
            lines.push(format!("File:         {}", path));
        }
        lines.join("\n")
    }

    fn format_message(&self, message: &str) -> String {
        format!("{} {}", "[OK]".green(), message)
    }

    fn format_violations(&self, error: &ValidationError) -> String {
        let mut lines = vec![format!("{} Device is not valid:", "[INVALID]".yellow())];
        for violation in &error.violations {
            lines.push(format!("  - {}", violation));
        }
        lines.join("\n")
    }

    fn format_error(&self, error: &str) -> String {
        format!("{} {}", "[FAIL]".red(), error)
    }
}

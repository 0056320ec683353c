//! Output formatting for CLI results.

pub mod json;
pub mod table;

pub use json::JsonOutput;
pub use table::TableOutput;

use netprint_core::error::{CoreError, SessionError, ValidationError};
use netprint_core::settings::Settings;
use netprint_core::DeviceRecord;

use crate::error::CliError;

/// Output formatter trait
pub trait OutputFormatter {
    /// Format device list
    fn format_devices(&self, devices: &[DeviceRecord]) -> String;

    /// Format a single device
    fn format_device(&self, device: &DeviceRecord) -> String;

    /// Format supported models
    fn format_models(&self, models: &[String]) -> String;

    /// Format effective settings
    fn format_settings(&self, settings: &Settings, path: Option<&str>) -> String;

    /// Format a generic message
    fn format_message(&self, message: &str) -> String;

    /// Format validation failures
    fn format_violations(&self, error: &ValidationError) -> String;

    /// Format an error
    fn format_error(&self, error: &str) -> String;

    /// Format a failed command
    fn format_failure(&self, error: &CliError) -> String {
        match error {
            CliError::Core(CoreError::Session(SessionError::Validation(v))) => {
                self.format_violations(v)
            }
            other => self.format_error(&other.to_string()),
        }
    }
}

/// Get the appropriate formatter based on JSON flag
pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonOutput::new())
    } else {
        Box::new(TableOutput::new())
    }
}

//! JSON-formatted output for CLI.

use serde::Serialize;
use serde_json::json;

use netprint_core::error::{CoreError, ErrorReport, SessionError, ValidationError};
use netprint_core::settings::Settings;
use netprint_core::DeviceRecord;

use super::OutputFormatter;
use crate::error::CliError;

pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }

    fn to_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for JsonOutput {
    fn format_devices(&self, devices: &[DeviceRecord]) -> String {
        Self::to_json(&json!({
            "devices": devices,
            "count": devices.len()
        }))
    }

    fn format_device(&self, device: &DeviceRecord) -> String {
        Self::to_json(device)
    }

    fn format_models(&self, models: &[String]) -> String {
        Self::to_json(&json!({
            "models": models,
            "count": models.len()
        }))
    }

    fn format_settings(&self, settings: &Settings, path: Option<&str>) -> String {
        Self::to_json(&json!({
            "settings": settings,
            "path": path
        }))
    }

    fn format_message(&self, message: &str) -> String {
        Self::to_json(&json!({
            "success": true,
            "message": message
        }))
    }

    fn format_violations(&self, error: &ValidationError) -> String {
        let messages: Vec<String> = error.violations.iter().map(ToString::to_string).collect();
        Self::to_json(&json!({
            "success": false,
            "violations": error.violations,
            "messages": messages
        }))
    }

    fn format_error(&self, error: &str) -> String {
        Self::to_json(&json!({
            "success": false,
            "error": error
        }))
    }

    fn format_failure(&self, error: &CliError) -> String {
        match error {
            CliError::Core(CoreError::Session(SessionError::Validation(v))) => {
                self.format_violations(v)
            }
            CliError::Core(core) => Self::to_json(&json!({
                "success": false,
                "error": ErrorReport::from(core),
                "exitCode": error.exit_code()
            })),
            other => Self::to_json(&json!({
                "success": false,
                "error": other.to_string(),
                "exitCode": other.exit_code()
            })),
        }
    }
}

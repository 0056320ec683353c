//! Error types for netprint core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::validate::Violation;

/// Core error type for shared operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Report error: {0}")]
    Parse(#[from] ParseError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),
}

impl CoreError {
    /// Whether the session cannot safely continue after this error.
    ///
    /// An unreachable tool or an unreadable report leaves no trustworthy
    /// device list; everything else is local to one operation.
    pub fn is_fatal(&self) -> bool {
        match self {
            CoreError::Store(e) => e.is_unavailable(),
            CoreError::Parse(_) => true,
            CoreError::Session(SessionError::Store(e)) => e.is_unavailable(),
            CoreError::Session(SessionError::Parse(_)) => true,
            _ => false,
        }
    }
}

/// Device store gateway errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Could not run {tool}: {source}")]
    Unavailable {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{operation} rejected by store: {message}")]
    Rejected { operation: String, message: String },
}

impl StoreError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable { .. })
    }

    pub(crate) fn rejected(operation: &str, message: impl Into<String>) -> Self {
        StoreError::Rejected {
            operation: operation.to_string(),
            message: message.into(),
        }
    }
}

/// Report parsing errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Report has no \"Devices on network\" header")]
    MissingHeader,

    #[error("Malformed device line {line}: {text}")]
    MalformedDevice { line: usize, text: String },

    #[error("Invalid address on line {line}: {text}")]
    InvalidAddress { line: usize, text: String },
}

/// All rule violations found in one validation pass.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{}", join_violations(.violations))]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Edit session errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Invalid device: {0}")]
    Validation(#[from] ValidationError),

    #[error("Device '{name}' was removed from the store but could not be re-added: {message}")]
    UpdateInterrupted { name: String, message: String },

    #[error("No device is selected")]
    NoSelection,

    #[error("Unknown device record")]
    UnknownRecord,
}

/// Settings storage errors
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to access settings directory: {0}")]
    DirectoryAccess(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Serializable error summary for JSON output.
#[derive(Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum ErrorReport {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store rejected operation: {0}")]
    Rejected(String),

    #[error("Invalid report: {0}")]
    Report(String),

    #[error("Invalid device: {0}")]
    Invalid(String),

    #[error("{0}")]
    Other(String),
}

impl From<&CoreError> for ErrorReport {
    fn from(e: &CoreError) -> Self {
        match e {
            CoreError::Store(se) | CoreError::Session(SessionError::Store(se)) => match se {
                StoreError::Unavailable { .. } => ErrorReport::Unavailable(se.to_string()),
                StoreError::Rejected { .. } => ErrorReport::Rejected(se.to_string()),
            },
            CoreError::Parse(pe) | CoreError::Session(SessionError::Parse(pe)) => {
                ErrorReport::Report(pe.to_string())
            }
            CoreError::Session(SessionError::Validation(ve)) => {
                ErrorReport::Invalid(ve.to_string())
            }
            CoreError::Session(interrupted @ SessionError::UpdateInterrupted { .. }) => {
                ErrorReport::Rejected(interrupted.to_string())
            }
            other => ErrorReport::Other(other.to_string()),
        }
    }
}

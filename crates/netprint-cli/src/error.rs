//! Error types for the netprint CLI.
//!
//! CliError wraps CoreError from the shared library and adds CLI-specific variants.

use netprint_core::error::{CoreError, SessionError};
use thiserror::Error;

// Re-export core error types so command modules can use them via crate::error
pub use netprint_core::error::{SettingsError, StoreError};

/// Exit codes for the CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const STORE_UNAVAILABLE: i32 = 2;
    pub const STORE_REJECTED: i32 = 3;
    pub const INVALID_ARGS: i32 = 4;
    pub const INVALID_DEVICE: i32 = 5;
}

/// Main error type for the CLI
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Core(#[from] CoreError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Prompt failed: {0}")]
    Prompt(String),
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Core(e) if e.is_fatal() => exit_codes::STORE_UNAVAILABLE,
            CliError::Core(e) => match e {
                CoreError::Session(SessionError::Validation(_)) => exit_codes::INVALID_DEVICE,
                CoreError::Store(_)
                | CoreError::Session(SessionError::Store(_))
                | CoreError::Session(SessionError::UpdateInterrupted { .. }) => {
                    exit_codes::STORE_REJECTED
                }
                _ => exit_codes::GENERAL_ERROR,
            },
            CliError::InvalidArgument(_) => exit_codes::INVALID_ARGS,
            CliError::DeviceNotFound(_) => exit_codes::INVALID_ARGS,
            CliError::Prompt(_) => exit_codes::GENERAL_ERROR,
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, CliError::Core(e) if e.is_fatal())
    }
}

// Conversions from core error subtypes to CliError
impl From<SessionError> for CliError {
    fn from(e: SessionError) -> Self {
        CliError::Core(CoreError::Session(e))
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        CliError::Core(CoreError::Store(e))
    }
}

impl From<SettingsError> for CliError {
    fn from(e: SettingsError) -> Self {
        CliError::Core(CoreError::Settings(e))
    }
}

impl From<dialoguer::Error> for CliError {
    fn from(e: dialoguer::Error) -> Self {
        CliError::Prompt(e.to_string())
    }
}

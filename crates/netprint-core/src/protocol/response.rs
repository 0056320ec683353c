//! Interpretation of store tool output.
//!
//! The tool does not reliably signal failure through its exit status: it
//! prints usage text when it dislikes its arguments, and add/remove report
//! problems as free text while succeeding silently.

use crate::error::StoreError;

/// Check whether output is the tool's usage text instead of data.
pub fn is_usage_text(output: &str) -> bool {
    output
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| line.to_ascii_uppercase().starts_with("USAGE"))
        .unwrap_or(false)
}

/// Interpret the output of an operation that must be silent on success.
pub fn check_silent_response(operation: &str, output: &str) -> Result<(), StoreError> {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        Ok(())
    } else {
        Err(StoreError::rejected(operation, trimmed))
    }
}

/// Interpret the output of the query operation.
pub fn check_query_response(output: &str) -> Result<(), StoreError> {
    if is_usage_text(output) {
        return Err(StoreError::rejected(
            "query",
            format!("tool printed usage text: {}", first_line(output)),
        ));
    }
    Ok(())
}

fn first_line(output: &str) -> &str {
    output
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("")
}

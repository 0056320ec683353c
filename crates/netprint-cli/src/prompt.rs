//! Terminal prompts for the edit session.

use dialoguer::{Confirm, Select};

use netprint_core::session::{Prompt, SwitchChoice, WorkingCopy};
use netprint_core::DeviceRecord;

/// Prompts on the terminal; `assume_yes` skips delete confirmations.
pub struct TerminalPrompt {
    assume_yes: bool,
}

impl TerminalPrompt {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

fn display_name(record: &DeviceRecord, working: &WorkingCopy) -> String {
    if !working.name.is_empty() {
        working.name.clone()
    } else if !record.name.is_empty() {
        record.name.clone()
    } else {
        "new device".to_string()
    }
}

impl Prompt for TerminalPrompt {
    fn resolve_unsaved(&mut self, record: &DeviceRecord, working: &WorkingCopy) -> SwitchChoice {
        let choices = &["Save changes", "Discard changes"];
        let selection = Select::new()
            .with_prompt(format!(
                "'{}' has unsaved changes",
                display_name(record, working)
            ))
            .items(choices)
            .default(0)
            .interact();

        match selection {
            Ok(1) => SwitchChoice::Discard,
            Ok(_) => SwitchChoice::Save,
            Err(e) => {
                tracing::warn!(error = %e, "prompt failed, keeping edits");
                SwitchChoice::Save
            }
        }
    }

    fn confirm_delete(&mut self, record: &DeviceRecord) -> bool {
        if self.assume_yes {
            return true;
        }

        Confirm::new()
            .with_prompt(format!("Delete device '{}'?", record.name))
            .default(false)
            .interact()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "prompt failed, not deleting");
                false
            })
    }
}

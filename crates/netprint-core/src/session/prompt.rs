//! User decisions the session cannot make on its own.

use crate::types::DeviceRecord;

use super::working::WorkingCopy;

/// What to do with unsaved edits before leaving a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchChoice {
    /// Commit the edits; a failed commit aborts the switch
    Save,
    /// Drop the edits (and the record itself if it was never committed)
    Discard,
}

/// Supplied by the presentation layer.
pub trait Prompt {
    /// Called when the user leaves a record that has unsaved edits.
    fn resolve_unsaved(&mut self, record: &DeviceRecord, working: &WorkingCopy) -> SwitchChoice;

    /// Called before a record is deleted.
    fn confirm_delete(&mut self, record: &DeviceRecord) -> bool;
}

/// Prompt with preset answers, for scripted use.
#[derive(Debug, Clone, Copy)]
pub struct FixedPrompt {
    pub choice: SwitchChoice,
    pub confirm: bool,
}

impl FixedPrompt {
    pub fn new(choice: SwitchChoice, confirm: bool) -> Self {
        Self { choice, confirm }
    }
}

impl Prompt for FixedPrompt {
    fn resolve_unsaved(&mut self, _record: &DeviceRecord, _working: &WorkingCopy) -> SwitchChoice {
        self.choice
    }

    fn confirm_delete(&mut self, _record: &DeviceRecord) -> bool {
        self.confirm
    }
}

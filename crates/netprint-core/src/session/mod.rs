//! Edit session: the selected record, its working copy and dirty tracking.
//!
//! The session holds at most one selected record. Edits go to a working
//! copy; the session is dirty while the working copy differs from the
//! committed record, while the record has never been committed, or while a
//! field carries a validation override. Leaving a dirty record (selecting
//! another, adding, deleting, refreshing) goes through the switch guard.

pub mod prompt;
pub mod validate;
pub mod working;

pub use prompt::{FixedPrompt, Prompt, SwitchChoice};
pub use validate::Violation;
pub use working::{Field, FieldEdit, WorkingCopy};

use serde::{Deserialize, Serialize};

use crate::error::{SessionError, ValidationError};
use crate::protocol::report::ReportParser;
use crate::registry::{DeviceRegistry, RecordKey};
use crate::store::DeviceStore;
use crate::types::DeviceRecord;

/// Observable state of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// No records exist
    Empty,
    /// Working copy equals the committed record
    Clean,
    /// Unsaved edits that would pass validation
    Dirty,
    /// Unsaved edits that currently fail validation
    DirtyBlocked,
}

/// Per-field flags forcing a field to count as changed.
///
/// Set when a field fails validation so the user can re-enter the original
/// value and still save. Cleared on selection and on successful commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOverrides {
    pub name: bool,
    pub model: bool,
    pub address_kind: bool,
    pub address: bool,
}

impl ValidationOverrides {
    pub fn get(&self, field: Field) -> bool {
        match field {
            Field::Name => self.name,
            Field::Model => self.model,
            Field::AddressKind => self.address_kind,
            Field::Address => self.address,
        }
    }

    fn set(&mut self, field: Field) {
        match field {
            Field::Name => self.name = true,
            Field::Model => self.model = true,
            Field::AddressKind => self.address_kind = true,
            Field::Address => self.address = true,
        }
    }

    pub fn any(&self) -> bool {
        Field::ALL.iter().any(|f| self.get(*f))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The store now holds the working copy's values
    Saved,
    /// Nothing to save
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Removed from the store and the registry
    Deleted(DeviceRecord),
    /// A never-committed record was dropped by the switch guard
    Discarded,
    /// The user declined the confirmation
    Cancelled,
}

#[derive(Debug, Clone)]
struct Selection {
    key: RecordKey,
    working: WorkingCopy,
    overrides: ValidationOverrides,
    dirty: bool,
}

/// Device editing session over a store.
pub struct EditSession<S: DeviceStore> {
    store: S,
    parser: ReportParser,
    registry: DeviceRegistry,
    selection: Option<Selection>,
}

impl<S: DeviceStore> EditSession<S> {
    /// Load the registry from the store and select the first record.
    pub fn open(mut store: S, parser: ReportParser) -> Result<Self, SessionError> {
        let registry = DeviceRegistry::load(&mut store, &parser)?;
        let mut session = Self {
            store,
            parser,
            registry,
            selection: None,
        };
        session.select_first();
        Ok(session)
    }

    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn models(&self) -> &[String] {
        self.registry.models()
    }

    pub fn current_key(&self) -> Option<RecordKey> {
        self.selection.as_ref().map(|s| s.key)
    }

    /// The committed values of the selected record.
    pub fn current_record(&self) -> Option<&DeviceRecord> {
        self.selection
            .as_ref()
            .and_then(|s| self.registry.get(s.key))
    }

    pub fn working_copy(&self) -> Option<&WorkingCopy> {
        self.selection.as_ref().map(|s| &s.working)
    }

    pub fn overrides(&self) -> ValidationOverrides {
        self.selection
            .as_ref()
            .map(|s| s.overrides)
            .unwrap_or_default()
    }

    pub fn is_dirty(&self) -> bool {
        self.selection.as_ref().is_some_and(|s| s.dirty)
    }

    pub fn status(&self) -> SessionStatus {
        match &self.selection {
            None => SessionStatus::Empty,
            Some(sel) if !sel.dirty => SessionStatus::Clean,
            Some(_) if self.check().is_err() => SessionStatus::DirtyBlocked,
            Some(_) => SessionStatus::Dirty,
        }
    }

    /// Re-seed the selection from the registry in one step.
    fn seed(&mut self, key: RecordKey) {
        self.selection = self.registry.get(key).map(|record| Selection {
            key,
            working: WorkingCopy::from_record(record),
            overrides: ValidationOverrides::default(),
            dirty: record.is_new,
        });
    }

    fn select_first(&mut self) {
        match self.registry.first_key() {
            Some(key) => self.seed(key),
            None => self.selection = None,
        }
    }

    fn recompute_dirty(&mut self) {
        let Some(sel) = self.selection.as_mut() else {
            return;
        };
        if let Some(committed) = self.registry.get(sel.key) {
            sel.dirty = committed.is_new
                || Field::ALL
                    .iter()
                    .any(|f| sel.working.differs(*f, committed) || sel.overrides.get(*f));
        }
    }

    /// Switch guard: settle unsaved edits before leaving the record.
    ///
    /// Does nothing when the session is clean. A failed save is returned and
    /// leaves the selection where it was.
    pub fn resolve_unsaved(&mut self, prompt: &mut dyn Prompt) -> Result<(), SessionError> {
        let (key, is_new, choice) = match &self.selection {
            Some(sel) if sel.dirty => {
                let record = self
                    .registry
                    .get(sel.key)
                    .ok_or(SessionError::UnknownRecord)?;
                (sel.key, record.is_new, prompt.resolve_unsaved(record, &sel.working))
            }
            _ => return Ok(()),
        };

        match choice {
            SwitchChoice::Save => {
                self.commit()?;
            }
            SwitchChoice::Discard if is_new => {
                tracing::debug!("discarding uncommitted device");
                self.registry.discard(key);
                self.selection = None;
            }
            SwitchChoice::Discard => {
                tracing::debug!("discarding unsaved edits");
                self.seed(key);
            }
        }

        Ok(())
    }

    /// Move the selection to `key`, resolving unsaved edits first.
    pub fn select(&mut self, key: RecordKey, prompt: &mut dyn Prompt) -> Result<(), SessionError> {
        if self.registry.get(key).is_none() {
            return Err(SessionError::UnknownRecord);
        }
        if self.current_key() == Some(key) {
            return Ok(());
        }

        self.resolve_unsaved(prompt)?;
        self.seed(key);
        Ok(())
    }

    pub fn select_name(&mut self, name: &str, prompt: &mut dyn Prompt) -> Result<(), SessionError> {
        let key = self
            .registry
            .key_of(name)
            .ok_or(SessionError::UnknownRecord)?;
        self.select(key, prompt)
    }

    /// Apply one field edit to the working copy.
    pub fn edit(&mut self, edit: FieldEdit) -> Result<SessionStatus, SessionError> {
        let sel = self.selection.as_mut().ok_or(SessionError::NoSelection)?;
        sel.working.apply(edit);
        self.recompute_dirty();
        Ok(self.status())
    }

    /// Check the working copy without touching override flags.
    pub fn check(&self) -> Result<(), ValidationError> {
        match &self.selection {
            None => Ok(()),
            Some(sel) => validate::validate(&sel.working, &self.registry, sel.key),
        }
    }

    /// Check the working copy, flagging every field that breaks a rule.
    pub fn validate(&mut self) -> Result<(), SessionError> {
        let sel = self.selection.as_mut().ok_or(SessionError::NoSelection)?;

        if let Err(err) = validate::validate(&sel.working, &self.registry, sel.key) {
            for violation in &err.violations {
                sel.overrides.set(violation.field());
            }
            self.recompute_dirty();
            return Err(err.into());
        }

        Ok(())
    }

    /// Validate and write the working copy to the store.
    pub fn commit(&mut self) -> Result<CommitOutcome, SessionError> {
        let (key, dirty) = self
            .selection
            .as_ref()
            .map(|s| (s.key, s.dirty))
            .ok_or(SessionError::NoSelection)?;

        if !dirty {
            return Ok(CommitOutcome::Unchanged);
        }

        self.validate()?;

        let record = {
            let sel = self.selection.as_ref().ok_or(SessionError::NoSelection)?;
            sel.working.to_record().ok_or_else(|| ValidationError {
                violations: vec![Violation::IncompleteIp {
                    missing: sel.working.missing_segments(),
                }],
            })?
        };

        let result = self
            .registry
            .commit(key, record, &mut self.store)
            .map(|_| ());

        match result {
            Ok(()) => {
                self.seed(key);
                Ok(CommitOutcome::Saved)
            }
            Err(err @ SessionError::UpdateInterrupted { .. }) => {
                self.recompute_dirty();
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Drop unsaved edits and show the committed values again.
    pub fn revert(&mut self) -> Result<(), SessionError> {
        let key = self.current_key().ok_or(SessionError::NoSelection)?;
        self.seed(key);
        Ok(())
    }

    /// Append a blank record and select it.
    pub fn add_new(&mut self, prompt: &mut dyn Prompt) -> Result<RecordKey, SessionError> {
        self.resolve_unsaved(prompt)?;
        let key = self.registry.insert_new();
        self.seed(key);
        Ok(key)
    }

    /// Delete the selected record after confirmation.
    pub fn delete(&mut self, prompt: &mut dyn Prompt) -> Result<DeleteOutcome, SessionError> {
        let key = self.current_key().ok_or(SessionError::NoSelection)?;
        self.resolve_unsaved(prompt)?;

        let Some(record) = self.registry.get(key) else {
            self.select_first();
            return Ok(DeleteOutcome::Discarded);
        };

        if !prompt.confirm_delete(record) {
            return Ok(DeleteOutcome::Cancelled);
        }

        let removed = self.registry.delete(key, &mut self.store)?;
        self.select_first();
        Ok(DeleteOutcome::Deleted(removed))
    }

    /// Re-query the store and rebuild the registry.
    ///
    /// Keeps the selection on the same name when it still exists.
    pub fn refresh(&mut self, prompt: &mut dyn Prompt) -> Result<(), SessionError> {
        self.resolve_unsaved(prompt)?;

        let selected = self.current_record().map(|r| r.name.clone());
        let lines = self.store.list()?;
        let report = self.parser.parse_lines(&lines)?;
        self.registry.reload(report);

        match selected.and_then(|name| self.registry.key_of(&name)) {
            Some(key) => self.seed(key),
            None => self.select_first(),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::store::{RecordingStore, StoreCall};
    use crate::types::{Address, AddressKind};
    use std::net::Ipv4Addr;

    /// Prompt that records how often it was asked.
    struct CountingPrompt {
        choice: SwitchChoice,
        confirm: bool,
        asked: usize,
        confirmations: usize,
    }

    impl CountingPrompt {
        fn new(choice: SwitchChoice) -> Self {
            Self {
                choice,
                confirm: true,
                asked: 0,
                confirmations: 0,
            }
        }
    }

    impl Prompt for CountingPrompt {
        fn resolve_unsaved(&mut self, _: &DeviceRecord, _: &WorkingCopy) -> SwitchChoice {
            self.asked += 1;
            self.choice
        }

        fn confirm_delete(&mut self, _: &DeviceRecord) -> bool {
            self.confirmations += 1;
            self.confirm
        }
    }

    fn ip(a: u8, b: u8, c: u8, d: u8) -> Address {
        Address::Ip(Ipv4Addr::new(a, b, c, d))
    }

    fn open(store: RecordingStore) -> EditSession<RecordingStore> {
        let mut session = EditSession::open(store, ReportParser::new()).unwrap();
        session.store_mut().clear_calls();
        session
    }

    fn two_printers() -> EditSession<RecordingStore> {
        open(
            RecordingStore::new(&["Model-A", "Model-B"])
                .with_device("Printer1", "Model-A", ip(192, 168, 1, 10))
                .with_device("Printer2", "Model-B", ip(192, 168, 1, 11)),
        )
    }

    fn names(session: &EditSession<RecordingStore>) -> Vec<String> {
        session.registry().records().map(|r| r.name.clone()).collect()
    }

    #[test]
    fn test_open_selects_first_clean() {
        let session = two_printers();
        assert_eq!(session.status(), SessionStatus::Clean);
        assert_eq!(session.current_record().unwrap().name, "Printer1");
        assert!(!session.overrides().any());
    }

    #[test]
    fn test_open_empty_store() {
        let session = open(RecordingStore::new(&["Model-A"]));
        assert_eq!(session.status(), SessionStatus::Empty);
        assert!(session.current_key().is_none());
    }

    #[test]
    fn test_open_unavailable_store() {
        let mut store = RecordingStore::new(&["Model-A"]);
        store.fail_next_list_unavailable();

        let err = EditSession::open(store, ReportParser::new()).err().unwrap();
        assert!(matches!(err, SessionError::Store(StoreError::Unavailable { .. })));
    }

    #[test]
    fn test_rename_and_commit_scenario() {
        let mut session = open(
            RecordingStore::new(&["Model-A"])
                .with_device("Printer1", "Model-A", ip(192, 168, 1, 10)),
        );
        let record = session.current_record().unwrap();
        assert_eq!(record.address, ip(192, 168, 1, 10));

        session.edit(FieldEdit::Name("Printer2".to_string())).unwrap();
        assert_eq!(session.status(), SessionStatus::Dirty);
        assert_eq!(session.commit().unwrap(), CommitOutcome::Saved);

        assert_eq!(
            session.store().calls(),
            &[
                StoreCall::Remove("Printer1".to_string()),
                StoreCall::Add(DeviceRecord {
                    id: None,
                    name: "Printer2".to_string(),
                    model: "Model-A".to_string(),
                    address: ip(192, 168, 1, 10),
                    is_new: false,
                }),
            ]
        );
        assert_eq!(names(&session), vec!["Printer2"]);
        assert_eq!(session.status(), SessionStatus::Clean);
    }

    #[test]
    fn test_edit_back_to_original_is_clean() {
        let mut session = two_printers();

        session.edit(FieldEdit::Name("Other".to_string())).unwrap();
        assert!(session.is_dirty());
        session.edit(FieldEdit::Name("Printer1".to_string())).unwrap();
        assert!(!session.is_dirty());

        session.edit(FieldEdit::IpSegment(3, Some(99))).unwrap();
        assert!(session.is_dirty());
        session.edit(FieldEdit::IpSegment(3, Some(10))).unwrap();
        assert_eq!(session.status(), SessionStatus::Clean);
    }

    #[test]
    fn test_address_kind_switch_is_an_edit() {
        let mut session = two_printers();

        session
            .edit(FieldEdit::AddressKind(AddressKind::Node))
            .unwrap();
        assert!(session.is_dirty());
        assert_eq!(session.status(), SessionStatus::DirtyBlocked);

        session.edit(FieldEdit::AddressKind(AddressKind::Ip)).unwrap();
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_override_keeps_original_value_savable() {
        let mut session = two_printers();

        session.edit(FieldEdit::Name(String::new())).unwrap();
        assert_eq!(session.status(), SessionStatus::DirtyBlocked);
        let err = session.commit().unwrap_err();
        assert!(matches!(err, SessionError::Validation(_)));
        assert!(session.overrides().name);
        assert!(session.store().calls().is_empty());

        session.edit(FieldEdit::Name("Printer1".to_string())).unwrap();
        assert!(session.is_dirty());
        assert_eq!(session.status(), SessionStatus::Dirty);

        assert_eq!(session.commit().unwrap(), CommitOutcome::Saved);
        assert_eq!(session.store().calls().len(), 2);
        assert!(!session.overrides().any());
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_commit_clean_is_noop() {
        let mut session = two_printers();
        assert_eq!(session.commit().unwrap(), CommitOutcome::Unchanged);
        assert!(session.store().calls().is_empty());
    }

    #[test]
    fn test_new_record_blank_name_fails_validation() {
        let mut session = two_printers();
        let mut prompt = CountingPrompt::new(SwitchChoice::Discard);

        session.add_new(&mut prompt).unwrap();
        assert_eq!(prompt.asked, 0);
        assert!(session.is_dirty());
        assert_eq!(session.registry().len(), 3);
        let before = session.registry().records().cloned().collect::<Vec<_>>();

        let err = session.commit().unwrap_err();
        match err {
            SessionError::Validation(v) => {
                assert!(v.violations.contains(&Violation::EmptyName));
                assert!(v.violations.contains(&Violation::EmptyModel));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(session.overrides().name);
        assert!(session.store().calls().is_empty());
        let after = session.registry().records().cloned().collect::<Vec<_>>();
        assert_eq!(before, after);
    }

    #[test]
    fn test_new_record_commit_only_adds() {
        let mut session = two_printers();
        let mut prompt = CountingPrompt::new(SwitchChoice::Discard);

        let key = session.add_new(&mut prompt).unwrap();
        session.edit(FieldEdit::Name("Printer3".to_string())).unwrap();
        session.edit(FieldEdit::Model("Model-B".to_string())).unwrap();
        session
            .edit(FieldEdit::Ip(Ipv4Addr::new(10, 1, 1, 1)))
            .unwrap();
        session.commit().unwrap();

        assert_eq!(session.store().calls().len(), 1);
        assert!(matches!(session.store().calls()[0], StoreCall::Add(_)));
        let record = session.registry().get(key).unwrap();
        assert!(!record.is_new);
        assert_eq!(session.status(), SessionStatus::Clean);
    }

    #[test]
    fn test_new_record_name_collision() {
        let mut session = two_printers();
        let mut prompt = FixedPrompt::new(SwitchChoice::Discard, true);

        session.add_new(&mut prompt).unwrap();
        session.edit(FieldEdit::Name("Printer2".to_string())).unwrap();
        session.edit(FieldEdit::Model("Model-B".to_string())).unwrap();

        let err = session.commit().unwrap_err();
        assert!(err.to_string().contains("already in use"));
        assert!(session.store().calls().is_empty());
    }

    #[test]
    fn test_discard_new_record_removes_it() {
        let mut session = two_printers();
        let mut prompt = CountingPrompt::new(SwitchChoice::Discard);
        let first = session.registry().first_key().unwrap();

        session.add_new(&mut prompt).unwrap();
        session.edit(FieldEdit::Name("Draft".to_string())).unwrap();
        session.select(first, &mut prompt).unwrap();

        assert_eq!(prompt.asked, 1);
        assert_eq!(names(&session), vec!["Printer1", "Printer2"]);
        assert_eq!(session.current_key(), Some(first));
        assert!(session.store().calls().is_empty());
    }

    #[test]
    fn test_discard_committed_restores_values() {
        let mut session = two_printers();
        let mut prompt = CountingPrompt::new(SwitchChoice::Discard);
        let first = session.current_key().unwrap();
        let second = session.registry().key_of("Printer2").unwrap();

        session.edit(FieldEdit::Name("Changed".to_string())).unwrap();
        session.select(second, &mut prompt).unwrap();
        session.select(first, &mut prompt).unwrap();

        assert_eq!(prompt.asked, 1);
        assert_eq!(session.working_copy().unwrap().name, "Printer1");
        assert_eq!(session.current_record().unwrap().name, "Printer1");
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_save_on_switch_commits() {
        let mut session = two_printers();
        let mut prompt = CountingPrompt::new(SwitchChoice::Save);
        let second = session.registry().key_of("Printer2").unwrap();

        session.edit(FieldEdit::Model("Model-B".to_string())).unwrap();
        session.select(second, &mut prompt).unwrap();

        assert_eq!(session.current_key(), Some(second));
        assert_eq!(session.registry().records().next().unwrap().model, "Model-B");
        assert_eq!(session.store().calls().len(), 2);
    }

    #[test]
    fn test_failed_save_aborts_switch() {
        let mut session = two_printers();
        let mut prompt = CountingPrompt::new(SwitchChoice::Save);
        let first = session.current_key().unwrap();
        let second = session.registry().key_of("Printer2").unwrap();

        session.edit(FieldEdit::Name(String::new())).unwrap();
        let err = session.select(second, &mut prompt).unwrap_err();

        assert!(matches!(err, SessionError::Validation(_)));
        assert_eq!(session.current_key(), Some(first));
        assert!(session.working_copy().unwrap().name.is_empty());
    }

    #[test]
    fn test_rejected_save_aborts_switch() {
        let mut session = two_printers();
        let mut prompt = CountingPrompt::new(SwitchChoice::Save);
        let first = session.current_key().unwrap();
        let second = session.registry().key_of("Printer2").unwrap();
        session.store_mut().fail_next_remove("device busy");

        session.edit(FieldEdit::Model("Model-B".to_string())).unwrap();
        let err = session.select(second, &mut prompt).unwrap_err();

        assert!(matches!(err, SessionError::Store(StoreError::Rejected { .. })));
        assert_eq!(prompt.asked, 1);
        assert_eq!(session.current_key(), Some(first));
        assert_eq!(session.status(), SessionStatus::Dirty);
        assert_eq!(session.working_copy().unwrap().model, "Model-B");
        assert_eq!(session.current_record().unwrap().model, "Model-A");
        assert_eq!(
            session.store().calls(),
            &[StoreCall::Remove("Printer1".to_string())]
        );
    }

    #[test]
    fn test_store_rejection_leaves_state() {
        let mut session = two_printers();
        session.store_mut().fail_next_remove("device busy");

        session.edit(FieldEdit::Model("Model-B".to_string())).unwrap();
        let err = session.commit().unwrap_err();

        assert!(matches!(err, SessionError::Store(StoreError::Rejected { .. })));
        assert!(session.is_dirty());
        assert_eq!(session.current_record().unwrap().model, "Model-A");
        assert!(!session.current_record().unwrap().is_new);
    }

    #[test]
    fn test_interrupted_update_retries_with_add_only() {
        let mut session = two_printers();
        session.store_mut().fail_next_add("Model name is incorrect");

        session.edit(FieldEdit::Name("Printer9".to_string())).unwrap();
        let err = session.commit().unwrap_err();
        assert!(matches!(err, SessionError::UpdateInterrupted { .. }));
        assert!(session.is_dirty());
        assert!(session.current_record().unwrap().is_new);
        assert_eq!(session.working_copy().unwrap().name, "Printer9");

        session.store_mut().clear_calls();
        session.commit().unwrap();
        assert_eq!(session.store().calls().len(), 1);
        assert!(matches!(session.store().calls()[0], StoreCall::Add(_)));
        assert!(session.store().devices().iter().any(|d| d.name == "Printer9"));
        assert!(!session.current_record().unwrap().is_new);
    }

    #[test]
    fn test_delete_moves_to_first() {
        let mut session = two_printers();
        let mut prompt = CountingPrompt::new(SwitchChoice::Discard);
        let second = session.registry().key_of("Printer2").unwrap();
        session.select(second, &mut prompt).unwrap();

        let outcome = session.delete(&mut prompt).unwrap();
        assert!(matches!(outcome, DeleteOutcome::Deleted(ref r) if r.name == "Printer2"));
        assert_eq!(prompt.confirmations, 1);
        assert_eq!(session.store().calls(), &[StoreCall::Remove("Printer2".to_string())]);
        assert_eq!(session.current_record().unwrap().name, "Printer1");

        session.delete(&mut prompt).unwrap();
        assert_eq!(session.status(), SessionStatus::Empty);
        assert!(session.registry().is_empty());
    }

    #[test]
    fn test_delete_cancelled() {
        let mut session = two_printers();
        let mut prompt = FixedPrompt::new(SwitchChoice::Discard, false);

        assert_eq!(session.delete(&mut prompt).unwrap(), DeleteOutcome::Cancelled);
        assert_eq!(session.registry().len(), 2);
        assert!(session.store().calls().is_empty());
    }

    #[test]
    fn test_delete_dirty_record_discard_then_decline() {
        let mut session = two_printers();
        let mut prompt = CountingPrompt::new(SwitchChoice::Discard);
        prompt.confirm = false;

        session.edit(FieldEdit::Name("Printer9".to_string())).unwrap();
        let outcome = session.delete(&mut prompt).unwrap();

        assert_eq!(outcome, DeleteOutcome::Cancelled);
        assert_eq!(prompt.asked, 1);
        assert_eq!(prompt.confirmations, 1);
        assert_eq!(session.status(), SessionStatus::Clean);
        assert_eq!(session.working_copy().unwrap().name, "Printer1");
        assert_eq!(names(&session), vec!["Printer1", "Printer2"]);
        assert!(session.store().calls().is_empty());
    }

    #[test]
    fn test_delete_dirty_new_record_discards() {
        let mut session = two_printers();
        let mut prompt = CountingPrompt::new(SwitchChoice::Discard);

        session.add_new(&mut prompt).unwrap();
        let outcome = session.delete(&mut prompt).unwrap();

        assert_eq!(outcome, DeleteOutcome::Discarded);
        assert_eq!(prompt.confirmations, 0);
        assert_eq!(session.registry().len(), 2);
        assert_eq!(session.current_record().unwrap().name, "Printer1");
        assert!(session.store().calls().is_empty());
    }

    #[test]
    fn test_add_new_while_dirty_runs_guard() {
        let mut session = two_printers();
        let mut prompt = CountingPrompt::new(SwitchChoice::Discard);

        session.add_new(&mut prompt).unwrap();
        session.add_new(&mut prompt).unwrap();

        assert_eq!(prompt.asked, 1);
        assert_eq!(session.registry().len(), 3);
    }

    #[test]
    fn test_unique_names_after_commits() {
        let mut session = two_printers();
        let mut prompt = FixedPrompt::new(SwitchChoice::Discard, true);

        session.edit(FieldEdit::Name("Printer2".to_string())).unwrap();
        assert!(session.commit().is_err());
        session.revert().unwrap();

        session.add_new(&mut prompt).unwrap();
        session.edit(FieldEdit::Name("Printer3".to_string())).unwrap();
        session.edit(FieldEdit::Model("Model-A".to_string())).unwrap();
        session.commit().unwrap();

        let mut all = names(&session);
        all.sort();
        all.dedup();
        assert_eq!(all.len(), session.registry().len());
    }

    #[test]
    fn test_refresh_keeps_selection_by_name() {
        let mut session = two_printers();
        let mut prompt = FixedPrompt::new(SwitchChoice::Discard, true);
        session.select_name("Printer2", &mut prompt).unwrap();

        session.refresh(&mut prompt).unwrap();
        assert_eq!(session.current_record().unwrap().name, "Printer2");
        assert_eq!(session.store().calls(), &[StoreCall::List]);
    }

    #[test]
    fn test_edit_without_selection() {
        let mut session = open(RecordingStore::new(&["Model-A"]));
        assert!(matches!(
            session.edit(FieldEdit::Name("x".to_string())),
            Err(SessionError::NoSelection)
        ));
    }
}

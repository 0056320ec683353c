//! In-memory device registry for the current session.
//!
//! Seeded from the store's report and kept in step with it: every local
//! mutation that touches a committed record is mirrored to the store first.

use serde::{Deserialize, Serialize};

use crate::error::{SessionError, StoreError};
use crate::protocol::report::ReportParser;
use crate::store::DeviceStore;
use crate::types::{DeviceRecord, DeviceReport};

/// Session-local handle for a registry entry.
///
/// Names change while a record is edited; the key does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordKey(u64);

#[derive(Debug, Clone)]
pub struct RegistryEntry {
    pub key: RecordKey,
    pub record: DeviceRecord,
}

/// Ordered collection of device records plus the supported model list.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    models: Vec<String>,
    entries: Vec<RegistryEntry>,
    next_key: u64,
}

impl DeviceRegistry {
    pub fn new(report: DeviceReport) -> Self {
        let mut registry = Self::default();
        registry.reload(report);
        registry
    }

    /// Query the store and build a registry from its report.
    pub fn load<S: DeviceStore>(store: &mut S, parser: &ReportParser) -> Result<Self, SessionError> {
        let lines = store.list()?;
        let report = parser.parse_lines(&lines)?;
        tracing::info!(
            devices = report.devices.len(),
            models = report.models.len(),
            "loaded device report"
        );
        Ok(Self::new(report))
    }

    /// Replace the contents with a fresh report. Old keys become invalid.
    pub fn reload(&mut self, report: DeviceReport) {
        let mut entries = Vec::with_capacity(report.devices.len());
        for record in report.devices {
            entries.push(RegistryEntry {
                key: self.allocate_key(),
                record,
            });
        }
        self.models = report.models;
        self.entries = entries;
    }

    fn allocate_key(&mut self) -> RecordKey {
        let key = RecordKey(self.next_key);
        self.next_key += 1;
        key
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn records(&self) -> impl Iterator<Item = &DeviceRecord> {
        self.entries.iter().map(|e| &e.record)
    }

    pub fn get(&self, key: RecordKey) -> Option<&DeviceRecord> {
        self.entries.iter().find(|e| e.key == key).map(|e| &e.record)
    }

    pub fn position(&self, key: RecordKey) -> Option<usize> {
        self.entries.iter().position(|e| e.key == key)
    }

    pub fn first_key(&self) -> Option<RecordKey> {
        self.entries.first().map(|e| e.key)
    }

    pub fn key_of(&self, name: &str) -> Option<RecordKey> {
        self.entries
            .iter()
            .find(|e| e.record.name == name)
            .map(|e| e.key)
    }

    /// Whether any record other than `except` already uses `name`.
    pub fn name_taken(&self, name: &str, except: RecordKey) -> bool {
        self.entries
            .iter()
            .filter(|e| e.key != except)
            .any(|e| e.record.name == name)
    }

    /// Append a blank, uncommitted record.
    pub fn insert_new(&mut self) -> RecordKey {
        let key = self.allocate_key();
        self.entries.push(RegistryEntry {
            key,
            record: DeviceRecord::blank(),
        });
        key
    }

    /// Drop a record locally without touching the store.
    pub fn discard(&mut self, key: RecordKey) -> Option<DeviceRecord> {
        let pos = self.position(key)?;
        Some(self.entries.remove(pos).record)
    }

    /// Write `record` to the store in place of the entry at `key`.
    ///
    /// Committed entries are removed from the store by their current name
    /// before the new values are added. If that removal succeeds and the add
    /// fails, the entry is marked uncommitted (the store no longer has it)
    /// and `SessionError::UpdateInterrupted` is returned.
    pub fn commit<S: DeviceStore>(
        &mut self,
        key: RecordKey,
        record: DeviceRecord,
        store: &mut S,
    ) -> Result<&DeviceRecord, SessionError> {
        let pos = self.position(key).ok_or(SessionError::UnknownRecord)?;
        let previous = &self.entries[pos].record;
        let was_new = previous.is_new;
        let old_name = previous.name.clone();

        if !was_new {
            store.remove(&old_name)?;
        }

        if let Err(e) = store.add(&record) {
            if was_new {
                return Err(e.into());
            }

            tracing::warn!(name = %old_name, error = %e, "device removed but replacement was rejected");
            self.entries[pos].record.is_new = true;
            return Err(SessionError::UpdateInterrupted {
                name: old_name,
                message: rejection_message(&e),
            });
        }

        let entry = &mut self.entries[pos];
        entry.record = DeviceRecord {
            id: None,
            is_new: false,
            ..record
        };

        if was_new {
            tracing::info!(name = %entry.record.name, "device created");
        } else {
            tracing::info!(old = %old_name, name = %entry.record.name, "device updated");
        }

        Ok(&entry.record)
    }

    /// Remove the entry from the store (if committed) and then locally.
    pub fn delete<S: DeviceStore>(
        &mut self,
        key: RecordKey,
        store: &mut S,
    ) -> Result<DeviceRecord, SessionError> {
        let record = self.get(key).ok_or(SessionError::UnknownRecord)?;

        if !record.is_new {
            store.remove(&record.name)?;
        }

        self.discard(key).ok_or(SessionError::UnknownRecord)
    }
}

fn rejection_message(e: &StoreError) -> String {
    match e {
        StoreError::Rejected { message, .. } => message.clone(),
        StoreError::Unavailable { .. } => e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{RecordingStore, StoreCall};
    use crate::types::Address;
    use std::net::Ipv4Addr;

    fn ip(d: u8) -> Address {
        Address::Ip(Ipv4Addr::new(10, 0, 0, d))
    }

    fn setup() -> (DeviceRegistry, RecordingStore) {
        let mut store = RecordingStore::new(&["Model-A", "Model-B"])
            .with_device("Printer1", "Model-A", ip(1))
            .with_device("Printer2", "Model-B", ip(2));
        let registry = DeviceRegistry::load(&mut store, &ReportParser::new()).unwrap();
        store.clear_calls();
        (registry, store)
    }

    #[test]
    fn test_load_preserves_order() {
        let (registry, _store) = setup();
        let names: Vec<_> = registry.records().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Printer1", "Printer2"]);
        assert_eq!(registry.models(), ["Model-A", "Model-B"]);
    }

    #[test]
    fn test_name_taken_excludes_self() {
        let (registry, _store) = setup();
        let first = registry.first_key().unwrap();

        assert!(!registry.name_taken("Printer1", first));
        assert!(registry.name_taken("Printer2", first));
        assert!(!registry.name_taken("Printer3", first));
    }

    #[test]
    fn test_commit_existing_removes_then_adds() {
        let (mut registry, mut store) = setup();
        let key = registry.key_of("Printer1").unwrap();

        let updated = DeviceRecord {
            id: None,
            name: "Renamed".to_string(),
            model: "Model-B".to_string(),
            address: ip(9),
            is_new: false,
        };
        registry.commit(key, updated.clone(), &mut store).unwrap();

        assert_eq!(
            store.calls(),
            &[
                StoreCall::Remove("Printer1".to_string()),
                StoreCall::Add(updated)
            ]
        );
        assert_eq!(registry.position(key), Some(0));
        assert_eq!(registry.get(key).unwrap().name, "Renamed");
        assert!(registry.key_of("Printer1").is_none());
    }

    #[test]
    fn test_commit_new_only_adds() {
        let (mut registry, mut store) = setup();
        let key = registry.insert_new();

        let record = DeviceRecord {
            name: "Printer3".to_string(),
            model: "Model-A".to_string(),
            ..DeviceRecord::blank()
        };
        registry.commit(key, record, &mut store).unwrap();

        assert_eq!(store.calls().len(), 1);
        assert!(matches!(store.calls()[0], StoreCall::Add(_)));
        assert!(!registry.get(key).unwrap().is_new);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_commit_remove_failure_leaves_entry() {
        let (mut registry, mut store) = setup();
        let key = registry.key_of("Printer1").unwrap();
        store.fail_next_remove("busy");

        let record = registry.get(key).unwrap().clone();
        let err = registry.commit(key, record, &mut store).unwrap_err();

        assert!(matches!(err, SessionError::Store(StoreError::Rejected { .. })));
        assert_eq!(store.calls().len(), 1);
        assert!(!registry.get(key).unwrap().is_new);
    }

    #[test]
    fn test_commit_interrupted_marks_uncommitted() {
        let (mut registry, mut store) = setup();
        let key = registry.key_of("Printer1").unwrap();
        store.fail_next_add("Model name is incorrect");

        let record = DeviceRecord {
            model: "Bogus".to_string(),
            ..registry.get(key).unwrap().clone()
        };
        let err = registry.commit(key, record, &mut store).unwrap_err();

        match err {
            SessionError::UpdateInterrupted { name, message } => {
                assert_eq!(name, "Printer1");
                assert_eq!(message, "Model name is incorrect");
            }
            other => panic!("unexpected error: {other}"),
        }
        let entry = registry.get(key).unwrap();
        assert!(entry.is_new);
        assert_eq!(entry.model, "Model-A");
        assert!(store.devices().iter().all(|d| d.name != "Printer1"));
    }

    #[test]
    fn test_delete_committed_and_new() {
        let (mut registry, mut store) = setup();
        let key = registry.key_of("Printer2").unwrap();

        let removed = registry.delete(key, &mut store).unwrap();
        assert_eq!(removed.name, "Printer2");
        assert_eq!(store.calls(), &[StoreCall::Remove("Printer2".to_string())]);

        let fresh = registry.insert_new();
        registry.delete(fresh, &mut store).unwrap();
        assert_eq!(store.calls().len(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_delete_rejected_keeps_entry() {
        let (mut registry, mut store) = setup();
        let key = registry.key_of("Printer2").unwrap();
        store.fail_next_remove("locked");

        assert!(registry.delete(key, &mut store).is_err());
        assert!(registry.get(key).is_some());
    }
}

//! In-memory store that records every call.
//!
//! Renders the same report format as the real tool, so the parser and the
//! session run unchanged against it.

use std::collections::VecDeque;

use crate::error::StoreError;
use crate::protocol::commands::DEFAULT_NODE_PREFIX;
use crate::protocol::report::DEVICES_HEADER;
use crate::types::{Address, DeviceRecord};

use super::DeviceStore;

/// One gateway call, in the order it was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    List,
    Add(DeviceRecord),
    Remove(String),
}

/// Scripted outcome for an upcoming call.
#[derive(Debug, Clone)]
enum Failure {
    Unavailable,
    Rejected(String),
}

/// In-memory device store with scriptable failures.
#[derive(Debug, Default)]
pub struct RecordingStore {
    models: Vec<String>,
    devices: Vec<DeviceRecord>,
    next_id: u32,
    calls: Vec<StoreCall>,
    list_failures: VecDeque<Failure>,
    add_failures: VecDeque<Failure>,
    remove_failures: VecDeque<Failure>,
}

impl RecordingStore {
    pub fn new(models: &[&str]) -> Self {
        Self {
            models: models.iter().map(|m| m.to_string()).collect(),
            next_id: 1,
            ..Default::default()
        }
    }

    /// Seed a device as if it had been added earlier.
    pub fn with_device(mut self, name: &str, model: &str, address: Address) -> Self {
        let id = self.allocate_id();
        self.devices.push(DeviceRecord {
            id: Some(id),
            name: name.to_string(),
            model: model.to_string(),
            address,
            is_new: false,
        });
        self
    }

    pub fn calls(&self) -> &[StoreCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn devices(&self) -> &[DeviceRecord] {
        &self.devices
    }

    pub fn fail_next_list_unavailable(&mut self) {
        self.list_failures.push_back(Failure::Unavailable);
    }

    pub fn fail_next_add(&mut self, message: &str) {
        self.add_failures
            .push_back(Failure::Rejected(message.to_string()));
    }

    pub fn fail_next_remove(&mut self, message: &str) {
        self.remove_failures
            .push_back(Failure::Rejected(message.to_string()));
    }

    fn allocate_id(&mut self) -> String {
        let id = format!("{:02}", self.next_id.max(1));
        self.next_id = self.next_id.max(1) + 1;
        id
    }

    fn take(queue: &mut VecDeque<Failure>, operation: &str) -> Result<(), StoreError> {
        match queue.pop_front() {
            None => Ok(()),
            Some(Failure::Unavailable) => Err(StoreError::Unavailable {
                tool: "memory".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "store offline"),
            }),
            Some(Failure::Rejected(message)) => Err(StoreError::rejected(operation, message)),
        }
    }

    fn render(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .models
            .iter()
            .enumerate()
            .map(|(idx, model)| format!("{:>3} \"{}\"", idx, model))
            .collect();
        lines.push(String::new());
        lines.push(DEVICES_HEADER.to_string());

        for device in &self.devices {
            let address = match &device.address {
                Address::Ip(ip) => {
                    let [a, b, c, d] = ip.octets();
                    format!("I:{:03}.{:03}.{:03}.{:03}", a, b, c, d)
                }
                Address::Node(node) => format!("N:{}{}", DEFAULT_NODE_PREFIX, node),
            };
            lines.push(format!(
                "{:>3} {:<16} \"{}\" {}",
                device.id.as_deref().unwrap_or("??"),
                device.name,
                device.model,
                address
            ));
        }

        lines
    }
}

impl DeviceStore for RecordingStore {
    fn list(&mut self) -> Result<Vec<String>, StoreError> {
        self.calls.push(StoreCall::List);
        Self::take(&mut self.list_failures, "query")?;
        Ok(self.render())
    }

    fn add(&mut self, record: &DeviceRecord) -> Result<(), StoreError> {
        self.calls.push(StoreCall::Add(record.clone()));
        Self::take(&mut self.add_failures, "add")?;

        if self.devices.iter().any(|d| d.name == record.name) {
            return Err(StoreError::rejected(
                "add",
                format!("Name {} is already registered", record.name),
            ));
        }

        let id = self.allocate_id();
        self.devices.push(DeviceRecord {
            id: Some(id),
            is_new: false,
            ..record.clone()
        });
        Ok(())
    }

    fn remove(&mut self, name: &str) -> Result<(), StoreError> {
        self.calls.push(StoreCall::Remove(name.to_string()));
        Self::take(&mut self.remove_failures, "remove")?;

        let before = self.devices.len();
        self.devices.retain(|d| d.name != name);
        if self.devices.len() == before {
            return Err(StoreError::rejected(
                "remove",
                format!("Device {} is not registered", name),
            ));
        }
        Ok(())
    }
}

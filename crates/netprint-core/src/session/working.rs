//! Working copy of the selected record's editable fields.

use std::fmt;
use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use crate::types::{Address, AddressKind, DeviceRecord};

/// Editable fields tracked for dirty state and validation overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Model,
    AddressKind,
    Address,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Name, Field::Model, Field::AddressKind, Field::Address];
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Name => "name",
            Field::Model => "model",
            Field::AddressKind => "address kind",
            Field::Address => "address",
        })
    }
}

/// A single user edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    Name(String),
    Model(String),
    AddressKind(AddressKind),
    /// Set or clear one of the four IPv4 segments (index 0..=3)
    IpSegment(usize, Option<u8>),
    /// Replace all four IPv4 segments
    Ip(Ipv4Addr),
    NodeName(String),
}

impl FieldEdit {
    /// The tracked field this edit touches.
    pub fn field(&self) -> Field {
        match self {
            FieldEdit::Name(_) => Field::Name,
            FieldEdit::Model(_) => Field::Model,
            FieldEdit::AddressKind(_) => Field::AddressKind,
            FieldEdit::IpSegment(..) | FieldEdit::Ip(_) | FieldEdit::NodeName(_) => Field::Address,
        }
    }
}

/// Field-level shadow of a record.
///
/// IPv4 segments and the node name are kept side by side, so switching the
/// address kind back and forth does not lose what was typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingCopy {
    pub name: String,
    pub model: String,
    pub address_kind: AddressKind,
    pub ip: [Option<u8>; 4],
    pub node: String,
}

impl WorkingCopy {
    pub fn from_record(record: &DeviceRecord) -> Self {
        let (ip, node) = match &record.address {
            Address::Ip(addr) => (addr.octets().map(Some), String::new()),
            Address::Node(node) => ([None; 4], node.clone()),
        };

        Self {
            name: record.name.clone(),
            model: record.model.clone(),
            address_kind: record.address_kind(),
            ip,
            node,
        }
    }

    /// Apply one edit. Out-of-range segment indices are ignored.
    pub fn apply(&mut self, edit: FieldEdit) {
        match edit {
            FieldEdit::Name(name) => self.name = name,
            FieldEdit::Model(model) => self.model = model,
            FieldEdit::AddressKind(kind) => self.address_kind = kind,
            FieldEdit::IpSegment(index, value) => {
                if let Some(segment) = self.ip.get_mut(index) {
                    *segment = value;
                }
            }
            FieldEdit::Ip(addr) => self.ip = addr.octets().map(Some),
            FieldEdit::NodeName(node) => self.node = node,
        }
    }

    /// The address for the selected kind, if it is complete.
    pub fn address(&self) -> Option<Address> {
        match self.address_kind {
            AddressKind::Ip => {
                let [a, b, c, d] = self.ip;
                Some(Address::Ip(Ipv4Addr::new(a?, b?, c?, d?)))
            }
            AddressKind::Node if self.node.is_empty() => None,
            AddressKind::Node => Some(Address::Node(self.node.clone())),
        }
    }

    /// Indices of blank IPv4 segments.
    pub fn missing_segments(&self) -> Vec<usize> {
        self.ip
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_none())
            .map(|(i, _)| i)
            .collect()
    }

    /// Whether `field` differs from the committed record.
    pub fn differs(&self, field: Field, committed: &DeviceRecord) -> bool {
        match field {
            Field::Name => self.name != committed.name,
            Field::Model => self.model != committed.model,
            Field::AddressKind => self.address_kind != committed.address_kind(),
            Field::Address => self.address().as_ref() != Some(&committed.address),
        }
    }

    /// Build the record to commit. `None` while the address is incomplete.
    pub fn to_record(&self) -> Option<DeviceRecord> {
        Some(DeviceRecord {
            id: None,
            name: self.name.clone(),
            model: self.model.clone(),
            address: self.address()?,
            is_new: false,
        })
    }

    /// IPv4 segments for display; blanks render empty.
    pub fn ip_text(&self) -> String {
        self.ip
            .iter()
            .map(|s| s.map(|v| v.to_string()).unwrap_or_default())
            .collect::<Vec<_>>()
            .join(".")
    }
}

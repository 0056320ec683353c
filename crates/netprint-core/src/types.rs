//! Device record types shared by the parser, registry and edit session.

use std::fmt;
use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

/// How a device is reached on the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressKind {
    /// IPv4 address
    Ip,
    /// Node name (store prefix stripped)
    Node,
}

impl AddressKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            AddressKind::Ip => "IP",
            AddressKind::Node => "Node",
        }
    }
}

/// A committed device address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Address {
    Ip(Ipv4Addr),
    Node(String),
}

impl Address {
    pub fn kind(&self) -> AddressKind {
        match self {
            Address::Ip(_) => AddressKind::Ip,
            Address::Node(_) => AddressKind::Node,
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Ip(ip) => write!(f, "{}", ip),
            Address::Node(node) => f.write_str(node),
        }
    }
}

/// Represents one device entry known to the external store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRecord {
    /// Store-assigned identifier; `None` until the store has reported it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Unique device name (the store's identity for the record)
    pub name: String,
    /// Model name, one of the supported models
    pub model: String,
    /// Network address
    pub address: Address,
    /// True until the record has been committed to the store
    pub is_new: bool,
}

impl DeviceRecord {
    /// Blank record for a device the user is about to enter.
    pub fn blank() -> Self {
        Self {
            id: None,
            name: String::new(),
            model: String::new(),
            address: Address::Ip(Ipv4Addr::UNSPECIFIED),
            is_new: true,
        }
    }

    pub fn address_kind(&self) -> AddressKind {
        self.address.kind()
    }
}

/// Parsed store report: supported models plus the device list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceReport {
    /// Supported model names, sorted ascending
    pub models: Vec<String>,
    /// Devices in store order
    pub devices: Vec<DeviceRecord>,
}

//! Argument builders for the device store tool.
//!
//! The tool owns its argument syntax; these builders must match it exactly.

use crate::types::{Address, DeviceRecord};

/// Default node-name prefix used by the store
pub const DEFAULT_NODE_PREFIX: &str = "BRN_";

/// Argument builders for the store tool
pub struct Commands;

impl Commands {
    /// Query the model list and the configured devices
    pub fn query() -> Vec<String> {
        vec!["-q".to_string()]
    }

    /// Add a device
    ///
    /// Node addresses are sent with the store's node prefix restored.
    pub fn add(record: &DeviceRecord, node_prefix: &str) -> Vec<String> {
        let address = match &record.address {
            Address::Ip(ip) => format!("ip={}", ip),
            Address::Node(node) => format!("nodename={}{}", node_prefix, node),
        };

        vec![
            "-a".to_string(),
            format!("name={}", record.name),
            format!("model={}", record.model),
            address,
        ]
    }

    /// Remove a device by name
    pub fn remove(name: &str) -> Vec<String> {
        vec!["-r".to_string(), name.to_string()]
    }
}

//! Device report parser.
//!
//! The store's query report lists supported models, then a header line,
//! then the configured devices:
//!
//! ```text
//!   0 "Model-A"
//!   1 "Model-B"
//!
//! Devices on network
//!   01 Printer1   "Model-A"   I:192.168.001.010
//!   02 Printer2   "Model-B"   N:BRN_0080927AFBCE
//! ```

use std::net::Ipv4Addr;

use regex::Regex;

use crate::error::ParseError;
use crate::protocol::commands::DEFAULT_NODE_PREFIX;
use crate::types::{Address, DeviceRecord, DeviceReport};

/// Header separating the model section from the device section
pub const DEVICES_HEADER: &str = "Devices on network";

/// `<index> "<model>"`
const MODEL_PATTERN: &str = r#"^\s*\d+\s+"([^"]+)"\s*$"#;

/// `<index>` with nothing after it
const BARE_INDEX_PATTERN: &str = r"^\s*\d+\s*$";

/// `<id> <name> "<model>" I:<ipv4>` or `... N:<prefix><node>`
const DEVICE_PATTERN: &str = r#"^\s*(\S+)\s+(\S+)\s+"([^"]*)"\s+([IN]):(\S+)\s*$"#;

/// Parser for the store's query report.
pub struct ReportParser {
    node_prefix: String,
    model_regex: Regex,
    bare_index_regex: Regex,
    device_regex: Regex,
}

impl ReportParser {
    pub fn new() -> Self {
        Self::with_node_prefix(DEFAULT_NODE_PREFIX)
    }

    /// Create a parser that strips the given prefix from node names.
    pub fn with_node_prefix(prefix: &str) -> Self {
        Self {
            node_prefix: prefix.to_string(),
            model_regex: Regex::new(MODEL_PATTERN).expect("static model pattern"),
            bare_index_regex: Regex::new(BARE_INDEX_PATTERN).expect("static index pattern"),
            device_regex: Regex::new(DEVICE_PATTERN).expect("static device pattern"),
        }
    }

    /// Parse a full report text.
    pub fn parse(&self, text: &str) -> Result<DeviceReport, ParseError> {
        self.parse_lines(text.lines())
    }

    /// Parse a report given as an ordered sequence of lines.
    pub fn parse_lines<I, S>(&self, lines: I) -> Result<DeviceReport, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut models = Vec::new();
        let mut devices = Vec::new();
        let mut in_devices = false;

        for (idx, line) in lines.into_iter().enumerate() {
            let line = line.as_ref();
            let line_no = idx + 1;

            if line.trim().is_empty() {
                continue;
            }

            if !in_devices {
                if line.trim() == DEVICES_HEADER {
                    in_devices = true;
                } else if let Some(caps) = self.model_regex.captures(line) {
                    models.push(caps[1].to_string());
                } else if self.bare_index_regex.is_match(line) {
                    tracing::debug!(line = line_no, "skipping model entry without a name");
                } else {
                    tracing::warn!(line = line_no, text = line, "skipping unrecognized model line");
                }
                continue;
            }

            devices.push(self.parse_device(line_no, line)?);
        }

        if !in_devices {
            return Err(ParseError::MissingHeader);
        }

        models.sort();
        models.dedup();

        Ok(DeviceReport { models, devices })
    }

    fn parse_device(&self, line_no: usize, line: &str) -> Result<DeviceRecord, ParseError> {
        let caps = self
            .device_regex
            .captures(line)
            .ok_or_else(|| ParseError::MalformedDevice {
                line: line_no,
                text: line.trim().to_string(),
            })?;

        let token = &caps[5];
        let address = match &caps[4] {
            "I" => Address::Ip(parse_padded_ipv4(token).ok_or_else(|| {
                ParseError::InvalidAddress {
                    line: line_no,
                    text: token.to_string(),
                }
            })?),
            _ => {
                let node = token.strip_prefix(self.node_prefix.as_str()).unwrap_or(token);
                Address::Node(node.to_string())
            }
        };

        Ok(DeviceRecord {
            id: Some(caps[1].to_string()),
            name: caps[2].to_string(),
            model: caps[3].to_string(),
            address,
            is_new: false,
        })
    }
}

impl Default for ReportParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an IPv4 address whose segments may be zero-padded (`192.168.001.010`).
pub fn parse_padded_ipv4(text: &str) -> Option<Ipv4Addr> {
    let mut octets = [0u8; 4];
    let mut parts = text.split('.');

    for octet in octets.iter_mut() {
        let part = parts.next()?;
        if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *octet = part.parse().ok()?;
    }

    if parts.next().is_some() {
        return None;
    }

    Some(Ipv4Addr::from(octets))
}

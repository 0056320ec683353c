//! Field rules checked before a working copy may be committed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::registry::{DeviceRegistry, RecordKey};
use crate::types::AddressKind;

use super::working::{Field, WorkingCopy};

/// One broken field rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Violation {
    EmptyName,
    NameTaken { name: String },
    NameWhitespace,
    EmptyModel,
    UnknownModel { model: String },
    IncompleteIp { missing: Vec<usize> },
    EmptyNode,
    NodeWhitespace,
}

impl Violation {
    /// The field held responsible for this violation.
    pub fn field(&self) -> Field {
        match self {
            Violation::EmptyName | Violation::NameTaken { .. } | Violation::NameWhitespace => {
                Field::Name
            }
            Violation::EmptyModel | Violation::UnknownModel { .. } => Field::Model,
            Violation::IncompleteIp { .. } | Violation::EmptyNode | Violation::NodeWhitespace => {
                Field::Address
            }
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::EmptyName => write!(f, "name must not be empty"),
            Violation::NameTaken { name } => write!(f, "name '{}' is already in use", name),
            Violation::NameWhitespace => write!(f, "name must not contain whitespace"),
            Violation::EmptyModel => write!(f, "model must be selected"),
            Violation::UnknownModel { model } => write!(f, "model '{}' is not supported", model),
            Violation::IncompleteIp { missing } => {
                let segments: Vec<String> = missing.iter().map(|i| (i + 1).to_string()).collect();
                write!(f, "IP address segment(s) {} must be filled in", segments.join(", "))
            }
            Violation::EmptyNode => write!(f, "node name must not be empty"),
            Violation::NodeWhitespace => write!(f, "node name must not contain whitespace"),
        }
    }
}

/// Check every rule and collect all violations.
///
/// `key` is the record being edited; its own current name never counts as
/// a collision.
pub fn validate(
    working: &WorkingCopy,
    registry: &DeviceRegistry,
    key: RecordKey,
) -> Result<(), ValidationError> {
    let mut violations = Vec::new();

    if working.name.is_empty() {
        violations.push(Violation::EmptyName);
    } else if working.name.chars().any(char::is_whitespace) {
        violations.push(Violation::NameWhitespace);
    } else if registry.name_taken(&working.name, key) {
        violations.push(Violation::NameTaken {
            name: working.name.clone(),
        });
    }

    let models = registry.models();
    if working.model.is_empty() {
        violations.push(Violation::EmptyModel);
    } else if !models.is_empty() && !models.iter().any(|m| *m == working.model) {
        violations.push(Violation::UnknownModel {
            model: working.model.clone(),
        });
    }

    match working.address_kind {
        AddressKind::Ip => {
            let missing = working.missing_segments();
            if !missing.is_empty() {
                violations.push(Violation::IncompleteIp { missing });
            }
        }
        AddressKind::Node => {
            if working.node.is_empty() {
                violations.push(Violation::EmptyNode);
            } else if working.node.chars().any(char::is_whitespace) {
                violations.push(Violation::NodeWhitespace);
            }
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { violations })
    }
}

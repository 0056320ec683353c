//! Shared core for netprint.
//!
//! Network printer records live in an external configuration tool. This
//! crate queries and parses the tool's report, keeps the records in an
//! in-memory registry and tracks edits to the selected record until they
//! are committed back to the tool.

pub mod error;
pub mod protocol;
pub mod registry;
pub mod session;
pub mod settings;
pub mod store;
pub mod types;

pub use error::{CoreError, ParseError, SessionError, StoreError, ValidationError};
pub use registry::{DeviceRegistry, RecordKey};
pub use session::{EditSession, FieldEdit, Prompt, SessionStatus, SwitchChoice};
pub use types::{Address, AddressKind, DeviceRecord, DeviceReport};

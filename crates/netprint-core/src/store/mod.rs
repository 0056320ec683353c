//! Device store gateway.
//!
//! The external tool owns every device record. [`DeviceStore`] is the only
//! seam through which the rest of the crate reads or writes it.

#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod tool;

#[cfg(any(test, feature = "test-util"))]
pub use memory::{RecordingStore, StoreCall};
pub use tool::ToolStore;

use crate::error::StoreError;
use crate::types::DeviceRecord;

/// Blocking access to the external device store.
///
/// Every call runs to completion before returning. `StoreError::Unavailable`
/// means the store could not be reached at all; `StoreError::Rejected` means
/// it was reached and refused the operation.
pub trait DeviceStore {
    /// Fetch the raw report lines.
    fn list(&mut self) -> Result<Vec<String>, StoreError>;

    /// Add a device. The record's `id` and `is_new` are ignored.
    fn add(&mut self, record: &DeviceRecord) -> Result<(), StoreError>;

    /// Remove the device with the given name.
    fn remove(&mut self, name: &str) -> Result<(), StoreError>;
}

impl<S: DeviceStore + ?Sized> DeviceStore for &mut S {
    fn list(&mut self) -> Result<Vec<String>, StoreError> {
        (**self).list()
    }

    fn add(&mut self, record: &DeviceRecord) -> Result<(), StoreError> {
        (**self).add(record)
    }

    fn remove(&mut self, name: &str) -> Result<(), StoreError> {
        (**self).remove(name)
    }
}

impl<S: DeviceStore + ?Sized> DeviceStore for Box<S> {
    fn list(&mut self) -> Result<Vec<String>, StoreError> {
        (**self).list()
    }

    fn add(&mut self, record: &DeviceRecord) -> Result<(), StoreError> {
        (**self).add(record)
    }

    fn remove(&mut self, name: &str) -> Result<(), StoreError> {
        (**self).remove(name)
    }
}

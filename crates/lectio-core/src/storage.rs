//! The [`PropertyStore`] trait.
//!
//! Trackers persist themselves as flat string maps, one named file per
//! tracker. Implementations live in `lectio-store-fs`; the trackers depend on
//! this abstraction only.

use std::collections::BTreeMap;

/// A flat key/value map as written to a single properties file.
pub type Properties = BTreeMap<String, String>;

/// Abstraction over flat key/value persistence.
///
/// `save_properties` replaces the whole file. `load_properties` on a file
/// that does not exist returns an empty map rather than an error.
pub trait PropertyStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn save_properties(
    &self,
    filename: &str,
    properties: &Properties,
  ) -> Result<(), Self::Error>;

  fn load_properties(&self, filename: &str) -> Result<Properties, Self::Error>;

  fn file_exists(&self, filename: &str) -> bool;

  /// Delete a file. Returns `false` if there was nothing to delete.
  fn delete_file(&self, filename: &str) -> Result<bool, Self::Error>;
}

//! An in-process [`PropertyStore`].

use std::collections::HashMap;

use lectio_core::storage::{Properties, PropertyStore};
use parking_lot::Mutex;

use crate::{Error, Result};

/// Holds every "file" in a map. Useful for tests and for sessions that
/// should leave nothing behind.
#[derive(Debug, Default)]
pub struct MemoryStore {
  files:     Mutex<HashMap<String, Properties>>,
  saves:     Mutex<HashMap<String, usize>>,
  read_only: Mutex<bool>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// Make every subsequent save fail with [`Error::ReadOnly`].
  pub fn set_read_only(&self, read_only: bool) { *self.read_only.lock() = read_only; }

  /// Number of successful saves to `filename`.
  pub fn save_count(&self, filename: &str) -> usize {
    self.saves.lock().get(filename).copied().unwrap_or(0)
  }

  /// Seed a file directly, bypassing the save counter.
  pub fn insert(&self, filename: &str, properties: Properties) {
    self.files.lock().insert(filename.to_string(), properties);
  }
}

impl PropertyStore for MemoryStore {
  type Error = Error;

  fn save_properties(&self, filename: &str, properties: &Properties) -> Result<()> {
    if *self.read_only.lock() {
      return Err(Error::ReadOnly);
    }
    self
      .files
      .lock()
      .insert(filename.to_string(), properties.clone());
    *self.saves.lock().entry(filename.to_string()).or_default() += 1;
    Ok(())
  }

  fn load_properties(&self, filename: &str) -> Result<Properties> {
    Ok(self.files.lock().get(filename).cloned().unwrap_or_default())
  }

  fn file_exists(&self, filename: &str) -> bool {
    self.files.lock().contains_key(filename)
  }

  fn delete_file(&self, filename: &str) -> Result<bool> {
    Ok(self.files.lock().remove(filename).is_some())
  }
}

//! The [`ResourceLoader`] trait and an in-memory implementation.
//!
//! Packaged texts (Bible XML, the lexicon JSON, the Strong's mapping file)
//! are addressed by an opaque identifier such as `"English KJV"`. How the
//! identifier maps onto bytes is the loader's business; the rest of the
//! workspace only sees the bytes or a `ResourceNotFound` error.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::{Error, Result};

/// Abstraction over where packaged resources come from.
pub trait ResourceLoader: Send + Sync {
  /// Load `id` with an explicit file extension (e.g. `"json"`, `"txt"`).
  fn load_resource_with_extension(
    &self,
    id: &str,
    extension: &str,
  ) -> Result<Vec<u8>>;

  /// Load a Bible resource; Bible texts are packaged as `.xml`.
  fn load_resource(&self, id: &str) -> Result<Vec<u8>> {
    self.load_resource_with_extension(id, "xml")
  }
}

/// The file name a resource identifier resolves to: spaces are dropped and a
/// leading `/` is ignored, so `"English KJV"` becomes `EnglishKJV.xml`.
pub fn resource_file_name(id: &str, extension: &str) -> String {
  let clean: String = id.trim_start_matches('/').replace(' ', "");
  format!("{clean}.{extension}")
}

// ─── In-memory loader ────────────────────────────────────────────────────────

/// A map-backed loader, keyed by [`resource_file_name`].
///
/// Counts how many times each file was served so callers can observe cache
/// behaviour.
#[derive(Default)]
pub struct MemoryResources {
  files: HashMap<String, Vec<u8>>,
  loads: Mutex<HashMap<String, usize>>,
}

impl MemoryResources {
  pub fn new() -> Self { Self::default() }

  pub fn with(
    mut self,
    id: &str,
    extension: &str,
    bytes: impl Into<Vec<u8>>,
  ) -> Self {
    self.insert(id, extension, bytes);
    self
  }

  pub fn insert(&mut self, id: &str, extension: &str, bytes: impl Into<Vec<u8>>) {
    self
      .files
      .insert(resource_file_name(id, extension), bytes.into());
  }

  /// Number of successful loads served for `id.extension`.
  pub fn load_count(&self, id: &str, extension: &str) -> usize {
    self
      .loads
      .lock()
      .get(&resource_file_name(id, extension))
      .copied()
      .unwrap_or(0)
  }
}

impl ResourceLoader for MemoryResources {
  fn load_resource_with_extension(
    &self,
    id: &str,
    extension: &str,
  ) -> Result<Vec<u8>> {
    let name = resource_file_name(id, extension);
    let bytes = self.files.get(&name).cloned().ok_or_else(|| {
      Error::ResourceNotFound {
        id:   id.to_string(),
        path: name.clone(),
      }
    })?;
    *self.loads.lock().entry(name).or_default() += 1;
    Ok(bytes)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn file_name_drops_spaces_and_leading_slash() {
    assert_eq!(resource_file_name("English KJV", "xml"), "EnglishKJV.xml");
    assert_eq!(resource_file_name("/lexicon", "json"), "lexicon.json");
  }

  #[test]
  fn memory_loader_serves_and_counts() {
    let res = MemoryResources::new().with("English KJV", "xml", "<bible/>");
    assert_eq!(res.load_resource("English KJV").unwrap(), b"<bible/>");
    assert_eq!(res.load_resource("EnglishKJV").unwrap(), b"<bible/>");
    assert_eq!(res.load_count("English KJV", "xml"), 2);
  }

  #[test]
  fn missing_resource_is_not_found() {
    let res = MemoryResources::new();
    let err = res.load_resource_with_extension("lexicon", "json").unwrap_err();
    assert!(matches!(err, Error::ResourceNotFound { ref path, .. } if path == "lexicon.json"));
  }
}

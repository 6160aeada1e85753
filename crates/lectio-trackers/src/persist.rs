//! Load/save helpers shared by every tracker.

use lectio_core::{
  VerseKey,
  storage::{Properties, PropertyStore},
};

/// Load `filename`, treating any failure as an empty file.
pub(crate) fn load<S: PropertyStore + ?Sized>(store: &S, filename: &str) -> Properties {
  match store.load_properties(filename) {
    Ok(props) => props,
    Err(err) => {
      tracing::warn!(filename, %err, "could not load tracker state; starting empty");
      Properties::new()
    }
  }
}

/// Rewrite `filename` in full. Failures are logged; the in-memory state stays
/// authoritative.
pub(crate) fn save<S: PropertyStore + ?Sized>(
  store: &S,
  filename: &str,
  props: &Properties,
) -> bool {
  match store.save_properties(filename, props) {
    Ok(()) => true,
    Err(err) => {
      tracing::warn!(filename, %err, "could not persist tracker state");
      false
    }
  }
}

pub(crate) fn verse_key(filename: &str, raw: &str) -> Option<VerseKey> {
  match raw.parse() {
    Ok(key) => Some(key),
    Err(err) => {
      tracing::warn!(filename, %err, "skipping entry with invalid key");
      None
    }
  }
}

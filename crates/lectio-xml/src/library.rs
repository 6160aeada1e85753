//! The process-scoped cache of parsed Bibles.

use std::{collections::BTreeMap, sync::Arc};

use lectio_core::{model::Bible, resource::ResourceLoader};
use parking_lot::RwLock;

use crate::{Result, parse_bible};

/// The translation used for book and chapter navigation.
pub const REFERENCE_TRANSLATION: &str = "English KJV";

/// Loads Bibles through a [`ResourceLoader`] and keeps every parsed document
/// for the lifetime of the library. Documents are never evicted.
///
/// The lock is held only to read or insert a pointer; parsing happens
/// outside it. If two callers race on the same id both parse, and the first
/// insert wins so that every caller sees the same `Arc`.
pub struct BibleLibrary<L> {
  loader: Arc<L>,
  loaded: RwLock<BTreeMap<String, Arc<Bible>>>,
}

impl<L: ResourceLoader> BibleLibrary<L> {
  pub fn new(loader: Arc<L>) -> Self {
    Self {
      loader,
      loaded: RwLock::new(BTreeMap::new()),
    }
  }

  /// Return the Bible registered under `id`, loading and parsing it on first
  /// use. The returned document's `translation` is always `id`.
  pub fn parse_from_resource(&self, id: &str) -> Result<Arc<Bible>> {
    if let Some(bible) = self.get(id) {
      tracing::debug!(id, "bible cache hit");
      return Ok(bible);
    }

    let bytes = self.loader.load_resource(id)?;
    let mut bible = parse_bible(&bytes)?;
    bible.translation = id.to_string();

    let mut loaded = self.loaded.write();
    let cached = loaded
      .entry(id.to_string())
      .or_insert_with(|| Arc::new(bible));
    tracing::info!(
      id,
      verses = cached.verse_count(),
      bytes = bytes.len(),
      "loaded bible"
    );
    Ok(Arc::clone(cached))
  }

  /// Load several Bibles, in order. Stops at the first failure.
  pub fn load_all<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<Arc<Bible>>> {
    ids
      .iter()
      .map(|id| self.parse_from_resource(id.as_ref()))
      .collect()
  }

  /// A cached Bible, without loading.
  pub fn get(&self, id: &str) -> Option<Arc<Bible>> {
    self.loaded.read().get(id).cloned()
  }

  /// Every cached Bible, ordered by id.
  pub fn loaded(&self) -> Vec<Arc<Bible>> {
    self.loaded.read().values().cloned().collect()
  }

  pub fn loaded_ids(&self) -> Vec<String> {
    self.loaded.read().keys().cloned().collect()
  }

  pub fn default_bible(&self) -> Result<Arc<Bible>> {
    self.parse_from_resource(REFERENCE_TRANSLATION)
  }

  /// Chapter numbers of `book` in the reference translation. A book the
  /// translation does not contain has no chapters.
  pub fn chapters_for_book(&self, book: u32) -> Result<Vec<u32>> {
    let bible = self.default_bible()?;
    Ok(bible.book(book).map(|b| b.chapter_numbers()).unwrap_or_default())
  }
}

#[cfg(test)]
mod tests {
  use lectio_core::resource::MemoryResources;

  use super::*;

  const KJV: &str = r#"<bible translation="KJV"><testament name="New">
    <book number="40"><chapter number="1"><verse number="1">The book of the generation of Jesus Christ</verse></chapter>
    <chapter number="2"><verse number="1">Now when Jesus was born</verse></chapter></book>
  </testament></bible>"#;

  fn library() -> BibleLibrary<MemoryResources> {
    let resources = MemoryResources::new()
      .with("English KJV", "xml", KJV)
      .with("Broken", "xml", "<bible><testament name=\"Old\">");
    BibleLibrary::new(Arc::new(resources))
  }

  #[test]
  fn translation_is_replaced_by_lookup_key() {
    let lib = library();
    let bible = lib.parse_from_resource("English KJV").unwrap();
    assert_eq!(bible.translation, "English KJV");
  }

  #[test]
  fn repeated_loads_share_one_document() {
    let lib = library();
    let first = lib.parse_from_resource("English KJV").unwrap();
    let second = lib.parse_from_resource("English KJV").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(*first, *second);
    assert_eq!(lib.loader.load_count("English KJV", "xml"), 1);
  }

  #[test]
  fn missing_resource_is_not_found_and_not_cached() {
    let lib = library();
    let err = lib.parse_from_resource("Klingon Bible").unwrap_err();
    assert!(err.is_not_found());
    assert!(lib.loaded_ids().is_empty());
  }

  #[test]
  fn parse_failures_are_not_cached() {
    let lib = library();
    assert!(lib.parse_from_resource("Broken").is_err());
    assert!(lib.get("Broken").is_none());
    assert!(lib.parse_from_resource("Broken").is_err());
    assert_eq!(lib.loader.load_count("Broken", "xml"), 2);
  }

  #[test]
  fn chapters_come_from_reference_translation() {
    let lib = library();
    assert_eq!(lib.chapters_for_book(40).unwrap(), vec![1, 2]);
    assert!(lib.chapters_for_book(41).unwrap().is_empty());
    assert_eq!(lib.loaded_ids(), vec!["English KJV".to_string()]);
  }

  #[tokio::test]
  async fn concurrent_first_loads_agree_on_identity() {
    let lib = Arc::new(library());
    let handles: Vec<_> = (0..4)
      .map(|_| {
        let lib = Arc::clone(&lib);
        tokio::task::spawn_blocking(move || {
          lib.parse_from_resource("English KJV").unwrap()
        })
      })
      .collect();

    let mut docs = Vec::new();
    for h in handles {
      docs.push(h.await.unwrap());
    }
    let cached = lib.get("English KJV").unwrap();
    assert!(docs.iter().all(|d| Arc::ptr_eq(d, &cached)));
  }
}

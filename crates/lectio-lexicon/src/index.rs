//! Lazily built O(1) lookups over the lexicon and the Strong's mapping.
//!
//! Each of the two indices moves through an explicit `Unloaded → Loaded`
//! lifecycle. Building happens outside the slot lock: a background preload
//! and an interactive lookup that both find a slot unloaded will both build
//! it, and whichever stores last wins. The builds are deterministic, so the
//! result is the same either way and no caller ever waits on another's
//! build.

use std::{collections::HashMap, sync::Arc};

use lectio_core::{books, resource::ResourceLoader};
use parking_lot::RwLock;

use crate::{
  Result,
  entry::{LexiconEntry, load_lexicon, strongs_id},
  mapping::{StrongsMappingVerse, load_strongs_mapping},
};

/// Prefix placed before a definition surfaced for a selected word.
pub const DEFINITION_LABEL: &str = "Strong's: ";

type EntryIndex = HashMap<String, LexiconEntry>;
type VerseIndex = HashMap<(u32, u32, u32), StrongsMappingVerse>;

// ─── Slot lifecycle ──────────────────────────────────────────────────────────

enum Slot<T> {
  Unloaded,
  Loaded(Arc<T>),
}

impl<T> Slot<T> {
  fn get(&self) -> Option<Arc<T>> {
    match self {
      Self::Unloaded => None,
      Self::Loaded(value) => Some(Arc::clone(value)),
    }
  }

  fn is_loaded(&self) -> bool { matches!(self, Self::Loaded(_)) }
}

// ─── Mapping offset ──────────────────────────────────────────────────────────

/// Convert a canonical book number to the mapping file's numbering.
///
/// The mapping only covers the New Testament, numbered from Matthew = 1.
/// Old Testament books have no mapping.
pub fn mapping_book(canonical: u32) -> Option<u32> {
  if books::NEW_TESTAMENT.contains(&canonical) {
    Some(canonical - books::LAST_OLD_TESTAMENT_BOOK)
  } else {
    None
  }
}

// ─── Index ───────────────────────────────────────────────────────────────────

pub struct LexiconIndex<L> {
  loader:           Arc<L>,
  strongs_to_entry: RwLock<Slot<EntryIndex>>,
  verse_to_mapping: RwLock<Slot<VerseIndex>>,
}

impl<L: ResourceLoader> LexiconIndex<L> {
  pub fn new(loader: Arc<L>) -> Self {
    Self {
      loader,
      strongs_to_entry: RwLock::new(Slot::Unloaded),
      verse_to_mapping: RwLock::new(Slot::Unloaded),
    }
  }

  /// Build the Strong's-id index if it is not built yet.
  pub fn ensure_lexicon(&self) -> Result<Arc<EntryIndex>> {
    if let Some(index) = self.strongs_to_entry.read().get() {
      return Ok(index);
    }

    let dict = load_lexicon(self.loader.as_ref())?;
    // Keyed by each entry's own id; on duplicates the entry latest in the
    // file wins.
    let index: EntryIndex = dict
      .entries
      .into_values()
      .map(|entry| (entry.strong.clone(), entry))
      .collect();
    let index = Arc::new(index);

    *self.strongs_to_entry.write() = Slot::Loaded(Arc::clone(&index));
    tracing::debug!(entries = index.len(), "built lexicon index");
    Ok(index)
  }

  /// Build the verse index if it is not built yet.
  pub fn ensure_mapping(&self) -> Result<Arc<VerseIndex>> {
    if let Some(index) = self.verse_to_mapping.read().get() {
      return Ok(index);
    }

    let rows = load_strongs_mapping(self.loader.as_ref())?;
    // Later rows for the same verse replace earlier ones.
    let index: VerseIndex = rows.into_iter().map(|row| (row.key(), row)).collect();
    let index = Arc::new(index);

    *self.verse_to_mapping.write() = Slot::Loaded(Arc::clone(&index));
    tracing::debug!(verses = index.len(), "built strong's verse index");
    Ok(index)
  }

  /// Force both indices. Safe to call repeatedly and concurrently with
  /// lookups.
  pub fn preload_data(&self) -> Result<()> {
    self.ensure_lexicon()?;
    self.ensure_mapping()?;
    Ok(())
  }

  /// Drop both indices; the next lookup rebuilds them.
  pub fn reset(&self) {
    *self.strongs_to_entry.write() = Slot::Unloaded;
    *self.verse_to_mapping.write() = Slot::Unloaded;
  }

  pub fn is_lexicon_loaded(&self) -> bool {
    self.strongs_to_entry.read().is_loaded()
  }

  pub fn is_mapping_loaded(&self) -> bool {
    self.verse_to_mapping.read().is_loaded()
  }

  pub fn get_lexicon_entry_by_strongs(
    &self,
    strongs: &str,
  ) -> Result<Option<LexiconEntry>> {
    Ok(self.ensure_lexicon()?.get(strongs).cloned())
  }

  /// Look up a verse by mapping-file numbering; see [`mapping_book`].
  pub fn get_strongs_mapping_for_verse(
    &self,
    book: u32,
    chapter: u32,
    verse: u32,
  ) -> Result<Option<StrongsMappingVerse>> {
    Ok(self.ensure_mapping()?.get(&(book, chapter, verse)).cloned())
  }

  /// The lexicon entry for the `word_index`-th word of a verse, addressed
  /// with canonical book numbering.
  pub fn word_entry(
    &self,
    book: u32,
    chapter: u32,
    verse: u32,
    word_index: usize,
  ) -> Result<Option<LexiconEntry>> {
    let Some(mapping_book) = mapping_book(book) else {
      return Ok(None);
    };
    let Some(row) =
      self.get_strongs_mapping_for_verse(mapping_book, chapter, verse)?
    else {
      return Ok(None);
    };
    let Some(word) = row.words.get(word_index) else {
      return Ok(None);
    };
    let Ok(number) = word.trim().parse::<u32>() else {
      tracing::debug!(%word, book, chapter, verse, "non-numeric strong's number");
      return Ok(None);
    };
    self.get_lexicon_entry_by_strongs(&strongs_id(number))
  }

  /// The labelled definition for a selected word, or an empty string when
  /// no annotation is available for any reason.
  pub fn word_definition(
    &self,
    book: u32,
    chapter: u32,
    verse: u32,
    word_index: usize,
  ) -> String {
    match self.word_entry(book, chapter, verse, word_index) {
      Ok(Some(entry)) => format!("{DEFINITION_LABEL}{}", entry.definition),
      Ok(None) => String::new(),
      Err(err) => {
        tracing::warn!(%err, "lexicon lookup failed");
        String::new()
      }
    }
  }
}

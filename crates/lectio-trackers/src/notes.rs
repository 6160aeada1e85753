//! Free-text notes keyed by verse.

use std::{collections::BTreeMap, sync::Arc};

use lectio_core::{
  VerseKey,
  storage::{Properties, PropertyStore},
};
use serde::Serialize;

use crate::persist;

pub const NOTES_FILE: &str = "notes.properties";

/// One note together with its address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteItem {
  pub key:       VerseKey,
  /// `"Book chapter:verse"`.
  pub reference: String,
  pub text:      String,
}

impl NoteItem {
  fn new(key: VerseKey, text: &str) -> Self {
    Self {
      key,
      reference: key.display_reference(),
      text: text.to_string(),
    }
  }

  fn matches(&self, needle: &str) -> bool {
    self.text.to_lowercase().contains(needle)
      || self.reference.to_lowercase().contains(needle)
  }
}

pub struct NoteTracker<S> {
  store: Arc<S>,
  notes: BTreeMap<VerseKey, String>,
}

impl<S: PropertyStore> NoteTracker<S> {
  pub fn load(store: Arc<S>) -> Self {
    let notes = persist::load(store.as_ref(), NOTES_FILE)
      .into_iter()
      .filter_map(|(raw, text)| {
        let key = persist::verse_key(NOTES_FILE, &raw)?;
        Some((key, text))
      })
      .collect();
    Self { store, notes }
  }

  /// The note on `key`, or an empty string.
  pub fn get_note(&self, key: VerseKey) -> &str {
    self.notes.get(&key).map(String::as_str).unwrap_or_default()
  }

  /// Store `text` on `key`. A blank note removes the entry.
  pub fn set_note(&mut self, key: VerseKey, text: &str) {
    if text.trim().is_empty() {
      self.notes.remove(&key);
    } else {
      self.notes.insert(key, text.to_string());
    }
    self.save();
  }

  pub fn has_note(&self, key: VerseKey) -> bool { self.notes.contains_key(&key) }

  pub fn remove_note(&mut self, key: VerseKey) {
    if self.notes.remove(&key).is_some() {
      self.save();
    }
  }

  /// Every note, ordered by book, chapter and verse.
  pub fn all_notes(&self) -> Vec<NoteItem> {
    self
      .notes
      .iter()
      .map(|(key, text)| NoteItem::new(*key, text))
      .collect()
  }

  /// Notes whose text or reference contains `query`, ignoring case. A blank
  /// query returns every note.
  pub fn search_notes(&self, query: &str) -> Vec<NoteItem> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
      return self.all_notes();
    }
    self
      .all_notes()
      .into_iter()
      .filter(|item| item.matches(&needle))
      .collect()
  }

  pub fn len(&self) -> usize { self.notes.len() }

  pub fn is_empty(&self) -> bool { self.notes.is_empty() }

  fn save(&self) {
    let props: Properties = self
      .notes
      .iter()
      .map(|(key, text)| (key.to_string(), text.clone()))
      .collect();
    persist::save(self.store.as_ref(), NOTES_FILE, &props);
  }
}

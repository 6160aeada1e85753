//! User-supplied pointers from a verse to related passages. Each verse holds
//! an ordered list without duplicates, persisted `|`-joined.

use std::{collections::BTreeMap, sync::Arc};

use lectio_core::{
  VerseKey,
  storage::{Properties, PropertyStore},
};

use crate::{Error, Result, persist};

pub const CROSS_REFERENCES_FILE: &str = "crossreferences.properties";

const SEPARATOR: &str = "|";

pub struct CrossReferenceTracker<S> {
  store: Arc<S>,
  refs:  BTreeMap<VerseKey, Vec<String>>,
}

impl<S: PropertyStore> CrossReferenceTracker<S> {
  pub fn load(store: Arc<S>) -> Self {
    let mut refs = BTreeMap::new();
    for (raw, value) in persist::load(store.as_ref(), CROSS_REFERENCES_FILE) {
      let Some(key) = persist::verse_key(CROSS_REFERENCES_FILE, &raw) else {
        continue;
      };
      let list: Vec<String> = value
        .split(SEPARATOR)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
        .collect();
      if !list.is_empty() {
        refs.insert(key, list);
      }
    }
    Self { store, refs }
  }

  pub fn get_cross_references(&self, key: VerseKey) -> &[String] {
    self.refs.get(&key).map(Vec::as_slice).unwrap_or_default()
  }

  /// Replace the whole list. References are trimmed, blanks and repeats are
  /// dropped, and an empty result removes the entry.
  pub fn set_cross_references(&mut self, key: VerseKey, refs: Vec<String>) -> Result<()> {
    let mut list: Vec<String> = Vec::with_capacity(refs.len());
    for raw in &refs {
      if raw.trim().is_empty() {
        continue;
      }
      let reference = checked_reference(raw)?;
      if !list.iter().any(|r| r == reference) {
        list.push(reference.to_string());
      }
    }
    if list.is_empty() {
      self.refs.remove(&key);
    } else {
      self.refs.insert(key, list);
    }
    self.save();
    Ok(())
  }

  /// Append the trimmed `reference` unless it is already listed. Returns
  /// whether the list changed.
  pub fn add_cross_reference(&mut self, key: VerseKey, reference: &str) -> Result<bool> {
    let reference = checked_reference(reference)?;
    let list = self.refs.entry(key).or_default();
    if list.iter().any(|r| r == reference) {
      return Ok(false);
    }
    list.push(reference.to_string());
    self.save();
    Ok(true)
  }

  /// Remove `reference` from the list; the entry goes when the list empties.
  /// Returns whether the list changed.
  pub fn remove_cross_reference(&mut self, key: VerseKey, reference: &str) -> bool {
    let Some(list) = self.refs.get_mut(&key) else {
      return false;
    };
    let before = list.len();
    list.retain(|r| r != reference);
    if list.len() == before {
      return false;
    }
    if list.is_empty() {
      self.refs.remove(&key);
    }
    self.save();
    true
  }

  pub fn has_cross_references(&self, key: VerseKey) -> bool { self.refs.contains_key(&key) }

  pub fn all_cross_references(&self) -> &BTreeMap<VerseKey, Vec<String>> { &self.refs }

  fn save(&self) {
    let props: Properties = self
      .refs
      .iter()
      .map(|(key, list)| (key.to_string(), list.join(SEPARATOR)))
      .collect();
    persist::save(self.store.as_ref(), CROSS_REFERENCES_FILE, &props);
  }
}

/// A reference must survive the `|`-joined file format unchanged.
fn checked_reference(raw: &str) -> Result<&str> {
  let reference = raw.trim();
  if reference.is_empty() || reference.contains(SEPARATOR) {
    return Err(Error::InvalidCrossReference(raw.to_string()));
  }
  Ok(reference)
}

//! Lexicon entries and the JSON dictionary loader.

use indexmap::IndexMap;
use lectio_core::resource::ResourceLoader;
use serde::{Deserialize, Serialize};

use crate::Result;

pub const LEXICON_RESOURCE: &str = "lexicon";

/// One Strong's dictionary entry. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconEntry {
  /// Strong's id as printed in the dictionary, e.g. `g0001`.
  pub strong:          String,
  pub part_of_speech:  String,
  pub transliteration: String,
  pub phonetic:        String,
  pub definition:      String,
  pub usage:           String,
  pub origin:          String,
}

/// The dictionary as stored: a flat JSON object of id → entry.
///
/// Entries keep their document order, which decides which entry wins when
/// two share a `strong` id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LexiconDictionary {
  pub entries: IndexMap<String, LexiconEntry>,
}

impl LexiconDictionary {
  pub fn from_json(json: &str) -> Result<Self> { Ok(serde_json::from_str(json)?) }

  pub fn len(&self) -> usize { self.entries.len() }

  pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

/// Load `lexicon.json` through `loader`. Any decoding error fails the whole
/// load.
pub fn load_lexicon<L: ResourceLoader + ?Sized>(
  loader: &L,
) -> Result<LexiconDictionary> {
  let bytes = loader.load_resource_with_extension(LEXICON_RESOURCE, "json")?;
  let dict: LexiconDictionary = serde_json::from_slice(&bytes)?;
  tracing::info!(entries = dict.len(), "loaded lexicon");
  Ok(dict)
}

/// Format a numeric Strong's number the way dictionary ids are written.
pub fn strongs_id(number: u32) -> String { format!("g{number:04}") }

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dictionary_is_a_flat_object() {
    let json = r#"{
      "g0001": {"strong": "g0001", "part_of_speech": "noun", "transliteration": "Alpha",
                "phonetic": "al'-fah", "definition": "the first letter", "usage": "Alpha",
                "origin": "of Hebrew origin"}
    }"#;
    let dict = LexiconDictionary::from_json(json).unwrap();
    assert_eq!(dict.len(), 1);
    assert_eq!(dict.entries["g0001"].definition, "the first letter");
  }

  #[test]
  fn entries_keep_document_order() {
    let json = r#"{
      "g0002": {"strong": "g0002", "part_of_speech": "", "transliteration": "",
                "phonetic": "", "definition": "b", "usage": "", "origin": ""},
      "g0001": {"strong": "g0001", "part_of_speech": "", "transliteration": "",
                "phonetic": "", "definition": "a", "usage": "", "origin": ""}
    }"#;
    let dict = LexiconDictionary::from_json(json).unwrap();
    let ids: Vec<&str> = dict.entries.keys().map(String::as_str).collect();
    assert_eq!(ids, vec!["g0002", "g0001"]);
  }

  #[test]
  fn missing_fields_fail_the_load() {
    let json = r#"{"g0001": {"strong": "g0001"}}"#;
    assert!(LexiconDictionary::from_json(json).is_err());
  }

  #[test]
  fn ids_are_zero_padded() {
    assert_eq!(strongs_id(1), "g0001");
    assert_eq!(strongs_id(2316), "g2316");
    assert_eq!(strongs_id(12345), "g12345");
  }
}

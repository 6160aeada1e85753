//! The Bible document model.
//!
//! Plain nested records: `Bible → Testament → Book → Chapter → Verse`. A
//! document is built once by the XML ingestion layer and is read-only from
//! then on; the lookup helpers here only ever borrow.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, books};

// ─── Testament ───────────────────────────────────────────────────────────────

/// The two top-level groupings of the canon.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
)]
pub enum TestamentName {
  Old,
  New,
}

impl TestamentName {
  /// Derive the testament from a canonical book number.
  ///
  /// Books 1–39 are Old Testament, everything above is New Testament.
  pub fn for_book(book: u32) -> Self {
    if book > books::LAST_OLD_TESTAMENT_BOOK {
      Self::New
    } else {
      Self::Old
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Old => "Old",
      Self::New => "New",
    }
  }
}

impl fmt::Display for TestamentName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for TestamentName {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim() {
      "Old" => Ok(Self::Old),
      "New" => Ok(Self::New),
      other => Err(Error::UnknownTestament(other.to_string())),
    }
  }
}

// ─── Document ────────────────────────────────────────────────────────────────

/// A single translation of the Bible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bible {
  /// The identifier the document was loaded under. The ingestion layer
  /// overwrites whatever the source file declared with the lookup key.
  pub translation: String,
  pub testaments:  Vec<Testament>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Testament {
  pub name:  TestamentName,
  pub books: Vec<Book>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
  /// Canonical book number, 1–66.
  pub number:   u32,
  pub chapters: Vec<Chapter>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
  pub number: u32,
  pub verses: Vec<Verse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verse {
  pub number:    u32,
  pub text:      String,
  /// Phonetic renderings keyed by language code. Filled in by presentation
  /// layers; ingestion leaves it empty.
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub phonetics: BTreeMap<String, String>,
}

impl Verse {
  pub fn new(number: u32, text: impl Into<String>) -> Self {
    Self {
      number,
      text: text.into(),
      phonetics: BTreeMap::new(),
    }
  }
}

// ─── Lookups ─────────────────────────────────────────────────────────────────

impl Bible {
  pub fn testament(&self, name: TestamentName) -> Option<&Testament> {
    self.testaments.iter().find(|t| t.name == name)
  }

  /// Find a book by canonical number, looking only in the testament the
  /// number belongs to.
  pub fn book(&self, number: u32) -> Option<&Book> {
    self
      .testament(TestamentName::for_book(number))?
      .books
      .iter()
      .find(|b| b.number == number)
  }

  pub fn chapter(&self, book: u32, chapter: u32) -> Option<&Chapter> {
    self.book(book)?.chapter(chapter)
  }

  pub fn verse(&self, book: u32, chapter: u32, verse: u32) -> Option<&Verse> {
    self.chapter(book, chapter)?.verse(verse)
  }

  /// Every verse in document order, with its enclosing book and chapter.
  pub fn verses(&self) -> impl Iterator<Item = (&Book, &Chapter, &Verse)> {
    self.testaments.iter().flat_map(|t| {
      t.books.iter().flat_map(|b| {
        b.chapters
          .iter()
          .flat_map(move |c| c.verses.iter().map(move |v| (b, c, v)))
      })
    })
  }

  pub fn verse_count(&self) -> usize { self.verses().count() }
}

impl Book {
  pub fn chapter(&self, number: u32) -> Option<&Chapter> {
    self.chapters.iter().find(|c| c.number == number)
  }

  pub fn chapter_numbers(&self) -> Vec<u32> {
    self.chapters.iter().map(|c| c.number).collect()
  }
}

impl Chapter {
  pub fn verse(&self, number: u32) -> Option<&Verse> {
    self.verses.iter().find(|v| v.number == number)
  }
}


#[cfg(test)]
mod tests {
  use super::{test_helpers::bible, *};

  #[test]
  fn testament_is_derived_from_book_number() {
    assert_eq!(TestamentName::for_book(1), TestamentName::Old);
    assert_eq!(TestamentName::for_book(39), TestamentName::Old);
    assert_eq!(TestamentName::for_book(40), TestamentName::New);
    assert_eq!(TestamentName::for_book(66), TestamentName::New);
  }

  #[test]
  fn testament_name_parses_strictly() {
    assert_eq!("Old".parse::<TestamentName>().unwrap(), TestamentName::Old);
    assert_eq!(" New ".parse::<TestamentName>().unwrap(), TestamentName::New);
    assert!("Apocrypha".parse::<TestamentName>().is_err());
  }

  #[test]
  fn lookups_find_nested_records() {
    let b = bible("KJV", &[
      (1, 1, 1, "In the beginning"),
      (1, 1, 2, "And the earth"),
      (43, 3, 16, "For God so loved"),
    ]);

    assert_eq!(b.verse(1, 1, 2).unwrap().text, "And the earth");
    assert_eq!(b.verse(43, 3, 16).unwrap().text, "For God so loved");
    assert_eq!(b.book(43).unwrap().chapter_numbers(), vec![3]);
    assert_eq!(b.verse_count(), 3);
  }

  #[test]
  fn missing_records_are_not_found() {
    let b = bible("KJV", &[(1, 1, 1, "In the beginning")]);
    assert!(b.book(2).is_none());
    assert!(b.chapter(1, 2).is_none());
    assert!(b.verse(1, 1, 9).is_none());
    assert!(b.testament(TestamentName::New).is_none());
  }

  #[test]
  fn empty_phonetics_are_not_serialised() {
    let json = serde_json::to_value(Verse::new(1, "text")).unwrap();
    assert!(json.get("phonetics").is_none());
  }
}

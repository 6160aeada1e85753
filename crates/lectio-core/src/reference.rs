//! The composite `book:chapter:verse` key shared by every
//! tracker and persisted verbatim as a property-file key.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, books};

/// A verse address using canonical book numbering.
///
/// Ordering is by book, then chapter, then verse.
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
pub struct VerseKey {
  pub book:    u32,
  pub chapter: u32,
  pub verse:   u32,
}

impl VerseKey {
  pub const fn new(book: u32, chapter: u32, verse: u32) -> Self {
    Self {
      book,
      chapter,
      verse,
    }
  }

  /// Human-readable reference, e.g. `John 3:16`. Books outside the canon
  /// render as `Book N`.
  pub fn display_reference(&self) -> String {
    match books::book_name(self.book) {
      Some(name) => format!("{name} {}:{}", self.chapter, self.verse),
      None => format!("Book {} {}:{}", self.book, self.chapter, self.verse),
    }
  }
}

impl fmt::Display for VerseKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}:{}", self.book, self.chapter, self.verse)
  }
}

impl FromStr for VerseKey {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    let invalid = || Error::InvalidVerseKey(s.to_string());
    let mut parts = s.split(':');
    let mut next = || -> Result<u32> {
      parts
        .next()
        .and_then(|p| p.trim().parse().ok())
        .ok_or_else(invalid)
    };
    let key = Self::new(next()?, next()?, next()?);
    if parts.next().is_some() {
      return Err(invalid());
    }
    Ok(key)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn display_and_parse_agree() {
    let key = VerseKey::new(43, 3, 16);
    assert_eq!(key.to_string(), "43:3:16");
    assert_eq!("43:3:16".parse::<VerseKey>().unwrap(), key);
  }

  #[test]
  fn malformed_keys_are_rejected() {
    for bad in ["", "43", "43:3", "43:3:16:1", "a:b:c", "43:-3:16"] {
      assert!(bad.parse::<VerseKey>().is_err(), "{bad:?} should not parse");
    }
  }

  #[test]
  fn ordering_is_canonical() {
    let mut keys = vec![
      VerseKey::new(43, 3, 16),
      VerseKey::new(1, 2, 1),
      VerseKey::new(1, 1, 31),
    ];
    keys.sort();
    assert_eq!(keys[0], VerseKey::new(1, 1, 31));
    assert_eq!(keys[2], VerseKey::new(43, 3, 16));
  }

  #[test]
  fn display_reference_uses_book_names() {
    assert_eq!(VerseKey::new(43, 3, 16).display_reference(), "John 3:16");
    assert_eq!(VerseKey::new(70, 1, 1).display_reference(), "Book 70 1:1");
  }
}

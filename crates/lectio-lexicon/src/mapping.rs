//! The Strong's word-mapping text format.
//!
//! One verse per line:
//!
//! ```text
//! 1.1.1 Βίβλος 976 N-NSF γενέσεως 1078 N-GSF ...
//! ```
//!
//! Token 0 is `book.chapter.verse`, with book numbered from the start of the
//! New Testament (Matthew is book 1). The rest of the line is a run of
//! `(word, strongs, tag)` triples; only the Strong's number in the middle is
//! kept. A trailing incomplete triple is dropped.

use lectio_core::resource::ResourceLoader;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const MAPPING_RESOURCE: &str = "strongs_mapping";

/// Lines this short or shorter are noise.
const MIN_LINE_CHARS: usize = 5;

/// The Strong's numbers for each word of one verse, in word order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrongsMappingVerse {
  /// New-Testament-relative book number.
  pub book:    u32,
  pub chapter: u32,
  pub verse:   u32,
  /// Decimal Strong's numbers without prefix or padding.
  pub words:   Vec<String>,
}

impl StrongsMappingVerse {
  pub fn key(&self) -> (u32, u32, u32) { (self.book, self.chapter, self.verse) }

  /// The `book.chapter.verse` form used in the source file.
  pub fn reference(&self) -> String {
    format!("{}.{}.{}", self.book, self.chapter, self.verse)
  }
}

fn parse_reference(token: &str) -> Option<(u32, u32, u32)> {
  let mut parts = token.split('.');
  let mut next = || parts.next()?.trim().parse::<u32>().ok();
  let reference = (next()?, next()?, next()?);
  if parts.next().is_some() {
    return None;
  }
  Some(reference)
}

/// Parse the whole mapping file.
pub fn parse_strongs_mapping(input: &str) -> Result<Vec<StrongsMappingVerse>> {
  let mut rows = Vec::new();

  for (index, raw) in input.split('\n').enumerate() {
    let line = raw.strip_suffix('\r').unwrap_or(raw);
    if line.chars().count() <= MIN_LINE_CHARS {
      continue;
    }

    let tokens: Vec<&str> = line.split(' ').collect();
    let (book, chapter, verse) =
      parse_reference(tokens[0]).ok_or_else(|| Error::InvalidReference {
        line:      index + 1,
        reference: tokens[0].to_string(),
      })?;

    let words = tokens[1..]
      .chunks_exact(3)
      .map(|triple| triple[1].to_string())
      .collect();

    rows.push(StrongsMappingVerse {
      book,
      chapter,
      verse,
      words,
    });
  }

  Ok(rows)
}

/// Load `strongs_mapping.txt` through `loader`.
pub fn load_strongs_mapping<L: ResourceLoader + ?Sized>(
  loader: &L,
) -> Result<Vec<StrongsMappingVerse>> {
  let bytes = loader.load_resource_with_extension(MAPPING_RESOURCE, "txt")?;
  let rows = parse_strongs_mapping(std::str::from_utf8(&bytes)?)?;
  tracing::info!(verses = rows.len(), "loaded strong's mapping");
  Ok(rows)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn keeps_middle_of_each_triple() {
    let rows = parse_strongs_mapping("1.1.1 Βίβλος 976 N-NSF γενέσεως 1078 N-GSF\n").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].key(), (1, 1, 1));
    assert_eq!(rows[0].words, vec!["976", "1078"]);
    assert_eq!(rows[0].reference(), "1.1.1");
  }

  #[test]
  fn incomplete_trailing_triple_is_dropped() {
    let rows = parse_strongs_mapping("2.3.4 a 1 x b 2 y c 3").unwrap();
    assert_eq!(rows[0].words, vec!["1", "2"]);
  }

  #[test]
  fn short_lines_are_skipped() {
    let input = "\n1.1.1\r\n  \n1.1.2 w 5 t\r\n";
    let rows = parse_strongs_mapping(input).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].key(), (1, 1, 2));
    assert_eq!(rows[0].words, vec!["5"]);
  }

  #[test]
  fn bad_reference_is_an_error() {
    let err = parse_strongs_mapping("1.1.1 a 1 b\nMatt.1.1 a 1 b").unwrap_err();
    assert!(matches!(err, Error::InvalidReference { line: 2, .. }));
  }

  #[test]
  fn extra_reference_segment_is_an_error() {
    let err = parse_strongs_mapping("1.1.1.9 a 1 b").unwrap_err();
    assert!(matches!(err, Error::InvalidReference { line: 1, ref reference } if reference == "1.1.1.9"));
  }

  #[test]
  fn invalid_utf8_fails_the_load() {
    let resources = lectio_core::resource::MemoryResources::new().with(
      MAPPING_RESOURCE,
      "txt",
      b"1.1.1 \xff 976 N\n".to_vec(),
    );
    let err = load_strongs_mapping(&resources).unwrap_err();
    assert!(matches!(err, Error::Encoding(_)));
  }
}

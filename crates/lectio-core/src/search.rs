//! Linear substring search across loaded Bibles.
//!
//! Every call rescans every verse; there is no index and no ranking.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{model::Bible, reference::VerseKey};

/// Queries this short or shorter return nothing.
pub const MIN_QUERY_CHARS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
  /// `"Book chapter:verse"`; results are unique on this field.
  pub reference:    String,
  pub text:         String,
  /// Translation the matching text was taken from.
  pub bible:        String,
  pub sort_by_book: u32,
}

impl std::fmt::Display for SearchResult {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}: {}", self.reference, self.text)
  }
}

/// Case-insensitive substring search over every verse of every Bible.
///
/// When the same reference matches in several translations the first
/// translation visited wins. Results are stably sorted by canonical book
/// number.
pub fn search<'a, I>(text: &str, bibles: I) -> Vec<SearchResult>
where
  I: IntoIterator<Item = &'a Bible>,
{
  if text.chars().count() <= MIN_QUERY_CHARS {
    return Vec::new();
  }
  let needle = text.to_lowercase();

  let mut seen = HashSet::new();
  let mut results = Vec::new();

  for bible in bibles {
    for (book, chapter, verse) in bible.verses() {
      if !verse.text.to_lowercase().contains(&needle) {
        continue;
      }
      let reference =
        VerseKey::new(book.number, chapter.number, verse.number)
          .display_reference();
      if !seen.insert(reference.clone()) {
        continue;
      }
      results.push(SearchResult {
        reference,
        text: verse.text.clone(),
        bible: bible.translation.clone(),
        sort_by_book: book.number,
      });
    }
  }

  results.sort_by_key(|r| r.sort_by_book);
  tracing::debug!(query = text, hits = results.len(), "search complete");
  results
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::test_helpers::bible;

  fn fixtures() -> (Bible, Bible) {
    let kjv = bible("English KJV", &[
      (1, 1, 1, "In the beginning God created the heaven and the earth."),
      (45, 5, 2, "By whom also we have access by faith into this grace"),
      (49, 2, 8, "For by Grace are ye saved through faith"),
    ]);
    let other = bible("English YLT", &[
      (1, 1, 1, "In the beginning of God's preparing the heavens"),
      (43, 1, 1, "In the beginning was the Word"),
    ]);
    (kjv, other)
  }

  #[test]
  fn finds_matches_in_one_translation() {
    let (kjv, ylt) = fixtures();
    let results = search("grace", [&ylt, &kjv]);
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].reference, "Romans 5:2");
    assert_eq!(results[1].reference, "Ephesians 2:8");
    assert!(results.iter().all(|r| r.bible == "English KJV"));
  }

  #[test]
  fn short_queries_return_nothing() {
    let (kjv, ylt) = fixtures();
    assert!(search("gr", [&kjv, &ylt]).is_empty());
    assert!(search("", [&kjv]).is_empty());
  }

  #[test]
  fn duplicate_references_are_collapsed_first_wins() {
    let (kjv, ylt) = fixtures();
    let results = search("beginning", [&ylt, &kjv]);
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].reference, "Genesis 1:1");
    assert_eq!(results[0].bible, "English YLT");
    assert_eq!(results[1].reference, "John 1:1");
  }

  #[test]
  fn results_are_sorted_by_book() {
    let (kjv, ylt) = fixtures();
    let results = search("faith", [&kjv, &ylt]);
    let books: Vec<u32> = results.iter().map(|r| r.sort_by_book).collect();
    assert_eq!(books, vec![45, 49]);
  }
}

//! The canonical 66-book table.
//!
//! Book numbers are fixed: 1–39 are the Old Testament (Genesis–Malachi) and
//! 40–66 the New Testament (Matthew–Revelation). Statistics and generated
//! reading plans measure progress against the chapter counts below rather
//! than against whatever a particular translation happens to contain.

use std::ops::RangeInclusive;

use serde::Serialize;

use crate::model::TestamentName;

pub const LAST_OLD_TESTAMENT_BOOK: u32 = 39;

pub const OLD_TESTAMENT: RangeInclusive<u32> = 1..=39;
pub const NEW_TESTAMENT: RangeInclusive<u32> = 40..=66;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BookInfo {
  pub number:   u32,
  pub name:     &'static str,
  pub chapters: u32,
}

const fn info(number: u32, name: &'static str, chapters: u32) -> BookInfo {
  BookInfo {
    number,
    name,
    chapters,
  }
}

pub static BOOKS: [BookInfo; 66] = [
  // Old Testament
  info(1, "Genesis", 50),
  info(2, "Exodus", 40),
  info(3, "Leviticus", 27),
  info(4, "Numbers", 36),
  info(5, "Deuteronomy", 34),
  info(6, "Joshua", 24),
  info(7, "Judges", 21),
  info(8, "Ruth", 4),
  info(9, "1 Samuel", 31),
  info(10, "2 Samuel", 24),
  info(11, "1 Kings", 22),
  info(12, "2 Kings", 25),
  info(13, "1 Chronicles", 29),
  info(14, "2 Chronicles", 36),
  info(15, "Ezra", 10),
  info(16, "Nehemiah", 13),
  info(17, "Esther", 10),
  info(18, "Job", 42),
  info(19, "Psalms", 150),
  info(20, "Proverbs", 31),
  info(21, "Ecclesiastes", 12),
  info(22, "Song of Solomon", 8),
  info(23, "Isaiah", 66),
  info(24, "Jeremiah", 52),
  info(25, "Lamentations", 5),
  info(26, "Ezekiel", 48),
  info(27, "Daniel", 12),
  info(28, "Hosea", 14),
  info(29, "Joel", 3),
  info(30, "Amos", 9),
  info(31, "Obadiah", 1),
  info(32, "Jonah", 4),
  info(33, "Micah", 7),
  info(34, "Nahum", 3),
  info(35, "Habakkuk", 3),
  info(36, "Zephaniah", 3),
  info(37, "Haggai", 2),
  info(38, "Zechariah", 14),
  info(39, "Malachi", 4),
  // New Testament
  info(40, "Matthew", 28),
  info(41, "Mark", 16),
  info(42, "Luke", 24),
  info(43, "John", 21),
  info(44, "Acts", 28),
  info(45, "Romans", 16),
  info(46, "1 Corinthians", 16),
  info(47, "2 Corinthians", 13),
  info(48, "Galatians", 6),
  info(49, "Ephesians", 6),
  info(50, "Philippians", 4),
  info(51, "Colossians", 4),
  info(52, "1 Thessalonians", 5),
  info(53, "2 Thessalonians", 3),
  info(54, "1 Timothy", 6),
  info(55, "2 Timothy", 4),
  info(56, "Titus", 3),
  info(57, "Philemon", 1),
  info(58, "Hebrews", 13),
  info(59, "James", 5),
  info(60, "1 Peter", 5),
  info(61, "2 Peter", 3),
  info(62, "1 John", 5),
  info(63, "2 John", 1),
  info(64, "3 John", 1),
  info(65, "Jude", 1),
  info(66, "Revelation", 22),
];

pub fn book_info(number: u32) -> Option<&'static BookInfo> {
  let index = usize::try_from(number.checked_sub(1)?).ok()?;
  BOOKS.get(index)
}

pub fn book_name(number: u32) -> Option<&'static str> {
  book_info(number).map(|b| b.name)
}

/// Chapter count for a canonical book. Unknown ids count as a single chapter.
pub fn chapter_count(number: u32) -> u32 {
  book_info(number).map_or(1, |b| b.chapters)
}

pub fn testament_of(number: u32) -> TestamentName {
  TestamentName::for_book(number)
}

/// Resolve an English book name (case-insensitive) to its canonical number.
pub fn book_id(name: &str) -> Option<u32> {
  let name = name.trim();
  BOOKS
    .iter()
    .find(|b| b.name.eq_ignore_ascii_case(name))
    .map(|b| b.number)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn table_is_numbered_in_order() {
    for (i, b) in BOOKS.iter().enumerate() {
      assert_eq!(b.number as usize, i + 1);
    }
    assert_eq!(BOOKS.iter().map(|b| b.chapters).sum::<u32>(), 1189);
  }

  #[test]
  fn names_and_counts() {
    assert_eq!(book_name(1), Some("Genesis"));
    assert_eq!(book_name(40), Some("Matthew"));
    assert_eq!(book_name(0), None);
    assert_eq!(book_name(67), None);
    assert_eq!(chapter_count(19), 150);
    assert_eq!(chapter_count(99), 1);
  }

  #[test]
  fn book_id_ignores_case() {
    assert_eq!(book_id("song of solomon"), Some(22));
    assert_eq!(book_id("  John "), Some(43));
    assert_eq!(book_id("Maccabees"), None);
  }

  #[test]
  fn testament_ranges() {
    assert!(OLD_TESTAMENT.contains(&39));
    assert!(NEW_TESTAMENT.contains(&40));
    assert_eq!(testament_of(66), TestamentName::New);
  }
}

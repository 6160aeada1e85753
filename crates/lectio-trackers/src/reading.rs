//! Which verses have been read, and when.
//!
//! File format: one `book:chapter:verse=YYYY-MM-DD` line per read verse. The
//! legacy value `true` marks a verse read without a date.

use std::{
  collections::{BTreeMap, BTreeSet, HashMap},
  sync::Arc,
};

use chrono::NaiveDate;
use lectio_core::{
  VerseKey,
  books,
  storage::{Properties, PropertyStore},
};
use serde::Serialize;

use crate::{persist, plans::ChapterProgress, today};

pub const READING_FILE: &str = "reading.properties";

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReadingStatistics {
  pub total_chapters_read:      usize,
  pub total_books_started:      usize,
  pub total_books_completed:    usize,
  pub current_streak:           u32,
  pub average_chapters_per_day: f64,
}

/// `YYYY-MM-DD` by shape only; the date itself may still be invalid.
fn looks_like_date(value: &str) -> bool {
  let bytes = value.as_bytes();
  bytes.len() == 10
    && bytes.iter().enumerate().all(|(i, b)| match i {
      4 | 7 => *b == b'-',
      _ => b.is_ascii_digit(),
    })
}

pub struct ReadingTracker<S> {
  store: Arc<S>,
  /// `None` means read at an unknown date.
  read:  BTreeMap<VerseKey, Option<NaiveDate>>,
}

impl<S: PropertyStore> ReadingTracker<S> {
  pub fn load(store: Arc<S>) -> Self {
    let mut read = BTreeMap::new();
    for (raw, value) in persist::load(store.as_ref(), READING_FILE) {
      let Some(key) = persist::verse_key(READING_FILE, &raw) else {
        continue;
      };
      let value = value.trim();
      if value == "true" {
        read.insert(key, None);
      } else if looks_like_date(value) {
        read.insert(key, NaiveDate::parse_from_str(value, DATE_FORMAT).ok());
      } else {
        tracing::debug!(%key, value, "ignoring unrecognised reading value");
      }
    }
    Self { store, read }
  }

  /// Mark `key` read today.
  pub fn mark_as_read(&mut self, key: VerseKey) { self.mark_as_read_on(key, today()) }

  pub fn mark_as_read_on(&mut self, key: VerseKey, date: NaiveDate) {
    self.read.insert(key, Some(date));
    self.save();
  }

  pub fn is_read(&self, key: VerseKey) -> bool { self.read.contains_key(&key) }

  /// The date `key` was read, if it was read and the date is known.
  pub fn read_on(&self, key: VerseKey) -> Option<NaiveDate> {
    self.read.get(&key).copied().flatten()
  }

  /// Forget every read verse.
  pub fn reset_reading_status(&mut self) {
    self.read.clear();
    self.save();
  }

  /// Book number to the distinct chapters with at least one read verse.
  pub fn read_sections(&self) -> BTreeMap<u32, Vec<u32>> {
    let mut sections: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
    for key in self.read.keys() {
      let chapters = sections.entry(key.book).or_default();
      // keys are ordered, so duplicates are adjacent
      if chapters.last() != Some(&key.chapter) {
        chapters.push(key.chapter);
      }
    }
    sections
  }

  /// Whether any verse of the chapter has been read. This does not check
  /// that every verse has been read; reading plans advance on this rule.
  pub fn is_chapter_read(&self, book: u32, chapter: u32) -> bool {
    let first = VerseKey::new(book, chapter, 0);
    self
      .read
      .range(first..)
      .next()
      .is_some_and(|(key, _)| key.book == book && key.chapter == chapter)
  }

  pub fn statistics(&self) -> ReadingStatistics { self.statistics_as_of(today()) }

  /// Statistics with the streak measured against `today`.
  pub fn statistics_as_of(&self, today: NaiveDate) -> ReadingStatistics {
    let sections = self.read_sections();
    let total_chapters_read = sections.values().map(Vec::len).sum();
    let total_books_completed = sections
      .iter()
      .filter(|(book, chapters)| chapters.len() as u32 == books::chapter_count(**book))
      .count();

    let dates: BTreeSet<NaiveDate> = self.read.values().flatten().copied().collect();

    ReadingStatistics {
      total_chapters_read,
      total_books_started: sections.len(),
      total_books_completed,
      current_streak: reading_streak(&dates, today),
      average_chapters_per_day: self.average_chapters_per_day(),
    }
  }

  pub fn len(&self) -> usize { self.read.len() }

  pub fn is_empty(&self) -> bool { self.read.is_empty() }

  /// Distinct chapters read per distinct date, averaged over the dates.
  fn average_chapters_per_day(&self) -> f64 {
    let mut per_day: HashMap<NaiveDate, BTreeSet<(u32, u32)>> = HashMap::new();
    for (key, date) in &self.read {
      if let Some(date) = date {
        per_day.entry(*date).or_default().insert((key.book, key.chapter));
      }
    }
    if per_day.is_empty() {
      return 0.0;
    }
    let total: usize = per_day.values().map(BTreeSet::len).sum();
    total as f64 / per_day.len() as f64
  }

  fn save(&self) {
    let today = today();
    let props: Properties = self
      .read
      .iter()
      .map(|(key, date)| {
        let date = date.unwrap_or(today);
        (key.to_string(), date.format(DATE_FORMAT).to_string())
      })
      .collect();
    persist::save(self.store.as_ref(), READING_FILE, &props);
  }
}

impl<S: PropertyStore> ChapterProgress for ReadingTracker<S> {
  fn is_chapter_read(&self, book: u32, chapter: u32) -> bool {
    ReadingTracker::is_chapter_read(self, book, chapter)
  }
}

/// Consecutive reading days ending at the most recent read date.
///
/// The streak is broken (zero) once the most recent date is older than
/// yesterday.
pub fn reading_streak(dates: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
  let Some(&last) = dates.last() else {
    return 0;
  };
  let Some(yesterday) = today.pred_opt() else {
    return 0;
  };
  if last < yesterday {
    return 0;
  }

  let mut streak = 1;
  let mut current = last.pred_opt();
  while let Some(day) = current {
    if !dates.contains(&day) {
      break;
    }
    streak += 1;
    current = day.pred_opt();
  }
  streak
}

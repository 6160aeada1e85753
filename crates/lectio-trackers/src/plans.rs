//! Reading plans: day-indexed schedules of book/chapter ranges.
//!
//! At most one plan of each [`ReadingPlanType`] exists at a time. Plans are
//! persisted in one file:
//!
//! ```text
//! plan_types=BIBLE_IN_A_YEAR,CUSTOM
//! BIBLE_IN_A_YEAR.name=Bible in a Year
//! BIBLE_IN_A_YEAR.start_date=2024-01-01
//! BIBLE_IN_A_YEAR.current_day=12
//! BIBLE_IN_A_YEAR.entries=1:1:1:3;2:1:4:6;...
//! ```

use std::{
  collections::BTreeMap,
  fmt,
  ops::RangeInclusive,
  str::FromStr,
  sync::Arc,
};

use chrono::{Days, NaiveDate};
use lectio_core::{
  books,
  storage::{Properties, PropertyStore},
};
use serde::Serialize;

use crate::{Error, Result, persist};

pub const PLANS_FILE: &str = "reading_plans.properties";

const PLAN_TYPES_KEY: &str = "plan_types";
const DATE_FORMAT: &str = "%Y-%m-%d";

// ─── Plan type ───────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
)]
pub enum ReadingPlanType {
  BibleInAYear,
  NewTestamentIn90Days,
  Custom,
}

impl ReadingPlanType {
  pub const ALL: [Self; 3] =
    [Self::BibleInAYear, Self::NewTestamentIn90Days, Self::Custom];

  /// The persisted name.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::BibleInAYear => "BIBLE_IN_A_YEAR",
      Self::NewTestamentIn90Days => "NEW_TESTAMENT_IN_90_DAYS",
      Self::Custom => "CUSTOM",
    }
  }

  pub fn default_name(self) -> &'static str {
    match self {
      Self::BibleInAYear => "Bible in a Year",
      Self::NewTestamentIn90Days => "New Testament in 90 Days",
      Self::Custom => "Custom Plan",
    }
  }

  pub fn default_description(self) -> &'static str {
    match self {
      Self::BibleInAYear => "Read through the entire Bible in 365 days",
      Self::NewTestamentIn90Days => "Read through the New Testament in 90 days",
      Self::Custom => "Custom reading plan",
    }
  }

  /// The generated schedule. Custom plans start empty.
  pub fn schedule(self) -> Vec<ReadingPlanEntry> {
    match self {
      Self::BibleInAYear => {
        schedule(*books::OLD_TESTAMENT.start()..=*books::NEW_TESTAMENT.end(), 3)
      }
      Self::NewTestamentIn90Days => schedule(books::NEW_TESTAMENT, 2),
      Self::Custom => Vec::new(),
    }
  }
}

impl fmt::Display for ReadingPlanType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.pad(self.as_str())
  }
}

impl FromStr for ReadingPlanType {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    Self::ALL
      .into_iter()
      .find(|t| t.as_str() == s.trim())
      .ok_or_else(|| Error::UnknownPlanType(s.to_string()))
  }
}

// ─── Entries ─────────────────────────────────────────────────────────────────

/// One day's reading: chapters `chapter_start..=chapter_end` of `book`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReadingPlanEntry {
  pub day:           u32,
  pub book:          u32,
  pub chapter_start: u32,
  pub chapter_end:   u32,
}

impl ReadingPlanEntry {
  pub const fn new(day: u32, book: u32, chapter_start: u32, chapter_end: u32) -> Self {
    Self {
      day,
      book,
      chapter_start,
      chapter_end,
    }
  }

  /// Days and chapters are 1-based and the chapter range must not be
  /// reversed, otherwise the day could never be read.
  pub fn validate(self) -> Result<Self> {
    if self.day == 0 || self.chapter_start == 0 || self.chapter_start > self.chapter_end {
      return Err(Error::InvalidPlanEntry(self.to_string()));
    }
    Ok(self)
  }

  pub fn chapters(&self) -> RangeInclusive<u32> { self.chapter_start..=self.chapter_end }

  pub fn covers(&self, book: u32, chapter: u32) -> bool {
    self.book == book && self.chapters().contains(&chapter)
  }

  /// e.g. `Genesis 1-3`, or `Obadiah 1` for a single chapter.
  pub fn display_reference(&self) -> String {
    let name = books::book_name(self.book)
      .map(str::to_string)
      .unwrap_or_else(|| format!("Book {}", self.book));
    if self.chapter_start == self.chapter_end {
      format!("{name} {}", self.chapter_start)
    } else {
      format!("{name} {}-{}", self.chapter_start, self.chapter_end)
    }
  }
}

impl fmt::Display for ReadingPlanEntry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{}:{}:{}:{}",
      self.day, self.book, self.chapter_start, self.chapter_end
    )
  }
}

impl FromStr for ReadingPlanEntry {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    let invalid = || Error::InvalidPlanEntry(s.to_string());
    let parts = s
      .split(':')
      .map(|p| p.trim().parse::<u32>().map_err(|_| invalid()))
      .collect::<Result<Vec<_>>>()?;
    match parts[..] {
      [day, book, start, end] => Self::new(day, book, start, end).validate(),
      _ => Err(invalid()),
    }
  }
}

/// One entry per day, each covering up to `per_day` chapters of a single
/// book.
fn schedule(book_numbers: RangeInclusive<u32>, per_day: u32) -> Vec<ReadingPlanEntry> {
  let mut entries = Vec::new();
  let mut day = 1;
  for book in book_numbers {
    let count = books::chapter_count(book);
    let mut chapter = 1;
    while chapter <= count {
      let end = (chapter + per_day - 1).min(count);
      entries.push(ReadingPlanEntry::new(day, book, chapter, end));
      day += 1;
      chapter = end + 1;
    }
  }
  entries
}

// ─── Plan ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingPlan {
  pub plan_type:   ReadingPlanType,
  pub name:        String,
  pub description: String,
  pub entries:     Vec<ReadingPlanEntry>,
  pub start_date:  NaiveDate,
  /// 1-based.
  pub current_day: u32,
}

impl ReadingPlan {
  pub fn new(plan_type: ReadingPlanType, start_date: NaiveDate) -> Self {
    Self {
      plan_type,
      name: plan_type.default_name().to_string(),
      description: plan_type.default_description().to_string(),
      entries: plan_type.schedule(),
      start_date,
      current_day: 1,
    }
  }

  pub fn max_day(&self) -> Option<u32> { self.entries.iter().map(|e| e.day).max() }

  pub fn reading_for_day(&self, day: u32) -> Option<&ReadingPlanEntry> {
    self.entries.iter().find(|e| e.day == day)
  }

  pub fn current_reading(&self) -> Option<&ReadingPlanEntry> {
    self.reading_for_day(self.current_day)
  }

  pub fn next_reading(&self) -> Option<&ReadingPlanEntry> {
    self
      .current_day
      .checked_add(1)
      .and_then(|day| self.reading_for_day(day))
  }

  /// Move to the next day, never past the last scheduled day. Returns whether
  /// the day changed.
  pub fn advance_to_next_day(&mut self) -> bool {
    let last = self.max_day().unwrap_or(self.current_day);
    let next = self.current_day.saturating_add(1).min(last);
    let advanced = next > self.current_day;
    self.current_day = self.current_day.max(next);
    advanced
  }

  pub fn is_completed(&self) -> bool { self.current_day > self.max_day().unwrap_or(0) }

  /// Whole percent of days already behind the reader, at most 100.
  pub fn progress_percent(&self) -> u32 {
    let max = u64::from(self.max_day().unwrap_or(1).max(1));
    let behind = u64::from(self.current_day.saturating_sub(1));
    (behind * 100 / max).min(100) as u32
  }

  pub fn estimated_completion_date(&self) -> NaiveDate {
    let span = self.max_day().unwrap_or(1).saturating_sub(1);
    self
      .start_date
      .checked_add_days(Days::new(u64::from(span)))
      .unwrap_or(self.start_date)
  }

  /// Days left including the current one.
  pub fn days_remaining(&self) -> u32 {
    self
      .max_day()
      .unwrap_or(0)
      .saturating_add(1)
      .saturating_sub(self.current_day)
  }
}

// ─── Manager ─────────────────────────────────────────────────────────────────

/// Whether a chapter counts as read for plan advancement.
pub trait ChapterProgress {
  fn is_chapter_read(&self, book: u32, chapter: u32) -> bool;
}

pub struct ReadingPlanManager<S> {
  store: Arc<S>,
  plans: BTreeMap<ReadingPlanType, ReadingPlan>,
}

impl<S: PropertyStore> ReadingPlanManager<S> {
  pub fn load(store: Arc<S>) -> Self {
    let props = persist::load(store.as_ref(), PLANS_FILE);
    let plans = props
      .get(PLAN_TYPES_KEY)
      .map(String::as_str)
      .unwrap_or_default()
      .split(',')
      .filter(|s| !s.trim().is_empty())
      .filter_map(|raw| match raw.parse::<ReadingPlanType>() {
        Ok(plan_type) => read_plan(&props, plan_type),
        Err(err) => {
          tracing::warn!(%err, "skipping reading plan");
          None
        }
      })
      .map(|plan| (plan.plan_type, plan))
      .collect();
    Self { store, plans }
  }

  pub fn get_plan(&self, plan_type: ReadingPlanType) -> Option<&ReadingPlan> {
    self.plans.get(&plan_type)
  }

  /// Start (or restart) the generated plan of `plan_type` on `start_date`.
  pub fn start_plan(
    &mut self,
    plan_type: ReadingPlanType,
    start_date: NaiveDate,
  ) -> &ReadingPlan {
    self.insert(ReadingPlan::new(plan_type, start_date))
  }

  /// Start (or replace) the custom plan. Fails without touching the current
  /// plan if any entry is invalid.
  pub fn start_custom_plan(
    &mut self,
    name: &str,
    description: &str,
    entries: Vec<ReadingPlanEntry>,
    start_date: NaiveDate,
  ) -> Result<&ReadingPlan> {
    let entries = entries
      .into_iter()
      .map(ReadingPlanEntry::validate)
      .collect::<Result<Vec<_>>>()?;
    Ok(self.insert(ReadingPlan {
      name: name.to_string(),
      description: description.to_string(),
      entries,
      ..ReadingPlan::new(ReadingPlanType::Custom, start_date)
    }))
  }

  pub fn update_plan(&mut self, plan: ReadingPlan) { self.insert(plan); }

  pub fn remove_plan(&mut self, plan_type: ReadingPlanType) -> bool {
    let removed = self.plans.remove(&plan_type).is_some();
    if removed {
      self.save();
    }
    removed
  }

  /// Every plan, in [`ReadingPlanType`] order.
  pub fn all_plans(&self) -> impl Iterator<Item = &ReadingPlan> { self.plans.values() }

  pub fn clear_all_plans(&mut self) {
    self.plans.clear();
    self.save();
  }

  /// Advance every plan whose current reading covers `book:chapter` and is
  /// now fully read according to `progress`. Returns the plans that moved.
  pub fn record_progress<P: ChapterProgress + ?Sized>(
    &mut self,
    progress: &P,
    book: u32,
    chapter: u32,
  ) -> Vec<ReadingPlanType> {
    let mut advanced = Vec::new();
    for plan in self.plans.values_mut() {
      let Some(entry) = plan.current_reading().copied() else {
        continue;
      };
      if !entry.covers(book, chapter) {
        continue;
      }
      if !entry.chapters().all(|c| progress.is_chapter_read(entry.book, c)) {
        continue;
      }
      if plan.advance_to_next_day() {
        tracing::info!(
          plan = plan.plan_type.as_str(),
          day = plan.current_day,
          "reading plan advanced"
        );
        advanced.push(plan.plan_type);
      }
    }
    if !advanced.is_empty() {
      self.save();
    }
    advanced
  }

  fn insert(&mut self, plan: ReadingPlan) -> &ReadingPlan {
    let plan_type = plan.plan_type;
    self.plans.insert(plan_type, plan);
    self.save();
    &self.plans[&plan_type]
  }

  fn save(&self) {
    let mut props = Properties::new();
    let types: Vec<&str> = self.plans.keys().map(|t| t.as_str()).collect();
    props.insert(PLAN_TYPES_KEY.to_string(), types.join(","));

    for (plan_type, plan) in &self.plans {
      let mut put = |field: &str, value: String| {
        props.insert(format!("{plan_type}.{field}"), value);
      };
      put("name", plan.name.clone());
      put("description", plan.description.clone());
      put("start_date", plan.start_date.format(DATE_FORMAT).to_string());
      put("current_day", plan.current_day.to_string());
      put(
        "entries",
        plan
          .entries
          .iter()
          .map(ToString::to_string)
          .collect::<Vec<_>>()
          .join(";"),
      );
    }
    persist::save(self.store.as_ref(), PLANS_FILE, &props);
  }
}

fn read_plan(props: &Properties, plan_type: ReadingPlanType) -> Option<ReadingPlan> {
  let get = |field: &str| props.get(&format!("{plan_type}.{field}"));

  let Some(start_date) = get("start_date")
    .and_then(|raw| NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok())
  else {
    tracing::warn!(plan = plan_type.as_str(), "skipping plan without a valid start date");
    return None;
  };

  let entries = get("entries")
    .map(String::as_str)
    .unwrap_or_default()
    .split(';')
    .filter(|s| !s.trim().is_empty())
    .filter_map(|raw| match raw.parse::<ReadingPlanEntry>() {
      Ok(entry) => Some(entry),
      Err(err) => {
        tracing::warn!(plan = plan_type.as_str(), %err, "skipping plan entry");
        None
      }
    })
    .collect();

  Some(ReadingPlan {
    plan_type,
    name: get("name")
      .cloned()
      .unwrap_or_else(|| plan_type.default_name().to_string()),
    description: get("description").cloned().unwrap_or_default(),
    entries,
    start_date,
    current_day: get("current_day")
      .and_then(|raw| raw.trim().parse().ok())
      .unwrap_or(1),
  })
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use lectio_store_fs::MemoryStore;

  use super::*;

  struct ReadChapters(HashSet<(u32, u32)>);

  impl ChapterProgress for ReadChapters {
    fn is_chapter_read(&self, book: u32, chapter: u32) -> bool {
      self.0.contains(&(book, chapter))
    }
  }

  fn date(s: &str) -> NaiveDate { NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap() }

  #[test]
  fn generated_schedules() {
    let year = ReadingPlanType::BibleInAYear.schedule();
    assert_eq!(year[0], ReadingPlanEntry::new(1, 1, 1, 3));
    // Genesis has 50 chapters: the 17th day reads 49-50
    assert_eq!(year[16], ReadingPlanEntry::new(17, 1, 49, 50));
    assert_eq!(year[17], ReadingPlanEntry::new(18, 2, 1, 3));
    assert_eq!(year.last().unwrap().book, 66);

    let nt = ReadingPlanType::NewTestamentIn90Days.schedule();
    assert_eq!(nt[0], ReadingPlanEntry::new(1, 40, 1, 2));
    assert!(nt.iter().all(|e| e.book >= 40));
    assert!(ReadingPlanType::Custom.schedule().is_empty());
  }

  #[test]
  fn plan_type_names_round_trip() {
    for plan_type in ReadingPlanType::ALL {
      assert_eq!(plan_type.as_str().parse::<ReadingPlanType>().unwrap(), plan_type);
    }
    assert!("WEEKLY".parse::<ReadingPlanType>().is_err());
  }

  #[test]
  fn entry_parsing_rejects_malformed_input() {
    assert_eq!(
      "3:43:1:2".parse::<ReadingPlanEntry>().unwrap(),
      ReadingPlanEntry::new(3, 43, 1, 2)
    );
    assert!("3:43:1".parse::<ReadingPlanEntry>().is_err());
    assert!("3:43:x:2".parse::<ReadingPlanEntry>().is_err());
  }

  #[test]
  fn unreadable_entries_are_rejected() {
    assert!("0:43:1:2".parse::<ReadingPlanEntry>().is_err());
    assert!("1:43:0:2".parse::<ReadingPlanEntry>().is_err());
    assert!("1:43:5:2".parse::<ReadingPlanEntry>().is_err());
    assert!("1:43:2:2".parse::<ReadingPlanEntry>().is_ok());

    let store = Arc::new(MemoryStore::new());
    let mut manager = ReadingPlanManager::load(Arc::clone(&store));
    manager
      .start_custom_plan("Mine", "", vec![ReadingPlanEntry::new(1, 43, 1, 1)], date("2024-01-01"))
      .unwrap();
    let err = manager
      .start_custom_plan(
        "Broken",
        "",
        vec![ReadingPlanEntry::new(1, 43, 1, 1), ReadingPlanEntry::new(2, 43, 3, 2)],
        date("2024-01-01"),
      )
      .unwrap_err();
    assert!(matches!(err, Error::InvalidPlanEntry(ref raw) if raw == "2:43:3:2"));
    assert_eq!(manager.get_plan(ReadingPlanType::Custom).unwrap().name, "Mine");
    assert_eq!(
      ReadingPlanManager::load(store).get_plan(ReadingPlanType::Custom).unwrap().name,
      "Mine"
    );
  }

  #[test]
  fn plan_progress_arithmetic() {
    let mut plan = ReadingPlan {
      entries: vec![
        ReadingPlanEntry::new(1, 1, 1, 3),
        ReadingPlanEntry::new(2, 1, 4, 6),
        ReadingPlanEntry::new(3, 1, 7, 9),
        ReadingPlanEntry::new(4, 1, 10, 12),
      ],
      ..ReadingPlan::new(ReadingPlanType::Custom, date("2024-01-01"))
    };
    assert_eq!(plan.progress_percent(), 0);
    assert_eq!(plan.days_remaining(), 4);
    assert_eq!(plan.estimated_completion_date(), date("2024-01-04"));
    assert_eq!(plan.next_reading().unwrap().chapter_start, 4);

    assert!(plan.advance_to_next_day());
    assert_eq!(plan.progress_percent(), 25);
    assert!(plan.advance_to_next_day());
    assert!(plan.advance_to_next_day());
    assert_eq!(plan.current_day, 4);
    assert!(!plan.advance_to_next_day());
    assert_eq!(plan.current_day, 4);
    assert!(!plan.is_completed());
    assert_eq!(plan.days_remaining(), 1);
  }

  #[test]
  fn huge_stored_day_does_not_overflow() {
    let store = MemoryStore::new();
    store.insert(
      PLANS_FILE,
      [
        ("plan_types", "CUSTOM"),
        ("CUSTOM.start_date", "2024-01-01"),
        ("CUSTOM.entries", "1:40:1:2;2:40:3:4"),
        ("CUSTOM.current_day", "4294967295"),
      ]
      .into_iter()
      .map(|(k, v)| (k.to_string(), v.to_string()))
      .collect(),
    );
    let manager = ReadingPlanManager::load(Arc::new(store));
    let mut plan = manager.get_plan(ReadingPlanType::Custom).unwrap().clone();
    assert_eq!(plan.current_day, u32::MAX);
    assert!(plan.next_reading().is_none());
    assert!(plan.current_reading().is_none());
    assert!(plan.is_completed());
    assert_eq!(plan.days_remaining(), 0);
    assert_eq!(plan.progress_percent(), 100);
    assert!(!plan.advance_to_next_day());
    assert_eq!(plan.current_day, u32::MAX);
  }

  #[test]
  fn empty_plan_is_complete() {
    let plan = ReadingPlan::new(ReadingPlanType::Custom, date("2024-01-01"));
    assert!(plan.is_completed());
    assert_eq!(plan.progress_percent(), 0);
    assert_eq!(plan.estimated_completion_date(), date("2024-01-01"));
    assert!(plan.current_reading().is_none());
  }

  #[test]
  fn progress_advances_when_range_is_read() {
    let mut manager = ReadingPlanManager::load(Arc::new(MemoryStore::new()));
    manager.start_plan(ReadingPlanType::BibleInAYear, date("2024-01-01"));
    manager.start_plan(ReadingPlanType::NewTestamentIn90Days, date("2024-01-01"));

    let mut read = ReadChapters(HashSet::from([(1, 1), (1, 2)]));
    assert!(manager.record_progress(&read, 1, 2).is_empty());

    read.0.insert((1, 3));
    assert_eq!(manager.record_progress(&read, 1, 3), vec![
      ReadingPlanType::BibleInAYear
    ]);
    let year = manager.get_plan(ReadingPlanType::BibleInAYear).unwrap();
    assert_eq!(year.current_day, 2);
    let nt = manager.get_plan(ReadingPlanType::NewTestamentIn90Days).unwrap();
    assert_eq!(nt.current_day, 1);

    // chapter outside the current reading
    assert!(manager.record_progress(&read, 1, 1).is_empty());
  }

  #[test]
  fn plans_persist_and_reload() {
    let store = Arc::new(MemoryStore::new());
    let mut manager = ReadingPlanManager::load(Arc::clone(&store));
    manager
      .start_custom_plan(
        "Gospels",
        "",
        vec![ReadingPlanEntry::new(1, 40, 1, 1), ReadingPlanEntry::new(2, 41, 1, 1)],
        date("2024-02-01"),
      )
      .unwrap();
    let mut plan = manager.get_plan(ReadingPlanType::Custom).unwrap().clone();
    plan.advance_to_next_day();
    manager.update_plan(plan.clone());

    let reloaded = ReadingPlanManager::load(Arc::clone(&store));
    assert_eq!(reloaded.get_plan(ReadingPlanType::Custom), Some(&plan));

    manager.clear_all_plans();
    assert_eq!(ReadingPlanManager::load(store).all_plans().count(), 0);
  }

  #[test]
  fn invalid_plans_and_entries_are_skipped() {
    let store = MemoryStore::new();
    store.insert(
      PLANS_FILE,
      [
        ("plan_types", "CUSTOM,WEEKLY,BIBLE_IN_A_YEAR"),
        ("CUSTOM.name", "Mine"),
        ("CUSTOM.start_date", "2024-01-01"),
        ("CUSTOM.entries", "1:40:1:2;bad;2:40:3"),
        ("BIBLE_IN_A_YEAR.name", "Broken"),
        ("BIBLE_IN_A_YEAR.start_date", "someday"),
      ]
      .into_iter()
      .map(|(k, v)| (k.to_string(), v.to_string()))
      .collect(),
    );
    let manager = ReadingPlanManager::load(Arc::new(store));
    assert_eq!(manager.all_plans().count(), 1);
    let custom = manager.get_plan(ReadingPlanType::Custom).unwrap();
    assert_eq!(custom.entries, vec![ReadingPlanEntry::new(1, 40, 1, 2)]);
    assert_eq!(custom.current_day, 1);
  }
}

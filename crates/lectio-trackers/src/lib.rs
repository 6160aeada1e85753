//! `lectio-trackers`: per-verse user state kept in flat property files.
//!
//! Every tracker is constructed over an injected [`PropertyStore`], loads its
//! file once at construction and rewrites it after each mutation. Reads are
//! served from memory.
//!
//! [`PropertyStore`]: lectio_core::storage::PropertyStore

pub mod cross_refs;
pub mod error;
pub mod journal;
pub mod notes;
pub mod plans;
pub mod reading;

mod persist;


use chrono::{Local, NaiveDate};

pub use cross_refs::CrossReferenceTracker;
pub use error::{Error, Result};
pub use journal::Journal;
pub use notes::{NoteItem, NoteTracker};
pub use plans::{
  ChapterProgress,
  ReadingPlan,
  ReadingPlanEntry,
  ReadingPlanManager,
  ReadingPlanType,
};
pub use reading::{ReadingStatistics, ReadingTracker};

/// Today's date in the local time zone.
pub fn today() -> NaiveDate { Local::now().date_naive() }

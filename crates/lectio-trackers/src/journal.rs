//! Every tracker over one store.

use std::sync::Arc;

use chrono::NaiveDate;
use lectio_core::{VerseKey, storage::PropertyStore};

use crate::{
  CrossReferenceTracker,
  NoteTracker,
  ReadingPlanManager,
  ReadingPlanType,
  ReadingTracker,
  today,
};

pub struct Journal<S> {
  pub notes:            NoteTracker<S>,
  pub reading:          ReadingTracker<S>,
  pub cross_references: CrossReferenceTracker<S>,
  pub plans:            ReadingPlanManager<S>,
}

impl<S: PropertyStore> Journal<S> {
  pub fn open(store: Arc<S>) -> Self {
    let journal = Self {
      notes:            NoteTracker::load(Arc::clone(&store)),
      reading:          ReadingTracker::load(Arc::clone(&store)),
      cross_references: CrossReferenceTracker::load(Arc::clone(&store)),
      plans:            ReadingPlanManager::load(store),
    };
    tracing::debug!(
      notes = journal.notes.len(),
      read_verses = journal.reading.len(),
      plans = journal.plans.all_plans().count(),
      "journal opened"
    );
    journal
  }

  /// Mark `key` read today and advance any plan this completes.
  pub fn mark_as_read(&mut self, key: VerseKey) -> Vec<ReadingPlanType> {
    self.mark_as_read_on(key, today())
  }

  pub fn mark_as_read_on(
    &mut self,
    key: VerseKey,
    date: NaiveDate,
  ) -> Vec<ReadingPlanType> {
    self.reading.mark_as_read_on(key, date);
    self.plans.record_progress(&self.reading, key.book, key.chapter)
  }
}

//! Command execution against the loaded services.

use std::{collections::BTreeSet, sync::Arc};

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use lectio_core::{
  VerseKey,
  books,
  resource::ResourceLoader,
  search::search,
  storage::PropertyStore,
};
use lectio_lexicon::{LexiconIndex, strongs_id};
use lectio_trackers::{
  Journal,
  ReadingPlan,
  ReadingPlanEntry,
  ReadingPlanType,
  today,
};
use lectio_xml::BibleLibrary;
use serde::Serialize;
use serde_json::json;

use crate::command::{Command, NoteCommand, PlanCommand, ReadCommand, XrefCommand};

// ─── Output ───────────────────────────────────────────────────────────────────

/// What a command produced: a value for `--json` and text for the terminal.
#[derive(Debug)]
pub struct Output {
  pub json: serde_json::Value,
  pub text: String,
}

impl Output {
  fn new<T: Serialize + ?Sized>(value: &T, text: impl Into<String>) -> Result<Self> {
    Ok(Self {
      json: serde_json::to_value(value).context("serialising output")?,
      text: text.into(),
    })
  }

  fn lines<T: Serialize + ?Sized>(value: &T, lines: Vec<String>) -> Result<Self> {
    Self::new(value, lines.join("\n"))
  }
}

// ─── References ───────────────────────────────────────────────────────────────

/// A book number or an English book name.
pub fn parse_book(s: &str) -> Result<u32> {
  let s = s.trim();
  if let Ok(number) = s.parse::<u32>() {
    books::book_info(number).with_context(|| format!("no book numbered {number}"))?;
    return Ok(number);
  }
  books::book_id(s).with_context(|| format!("unknown book: {s:?}"))
}

/// `43:3:16`, `John 3:16` or `John 3`. The verse is `None` for a whole
/// chapter.
pub fn parse_passage(s: &str) -> Result<(u32, u32, Option<u32>)> {
  let s = s.trim();
  if let Ok(key) = s.parse::<VerseKey>() {
    return Ok((key.book, key.chapter, Some(key.verse)));
  }

  let (book, location) = s
    .rsplit_once(' ')
    .with_context(|| format!("not a reference: {s:?}"))?;
  let book = parse_book(book)?;
  let number = |part: &str| {
    part
      .parse::<u32>()
      .with_context(|| format!("not a reference: {s:?}"))
  };
  match location.split_once(':') {
    Some((chapter, verse)) => Ok((book, number(chapter)?, Some(number(verse)?))),
    None => Ok((book, number(location)?, None)),
  }
}

/// Like [`parse_passage`] but a verse is required.
pub fn parse_verse(s: &str) -> Result<VerseKey> {
  match parse_passage(s)? {
    (book, chapter, Some(verse)) => Ok(VerseKey::new(book, chapter, verse)),
    _ => bail!("{s:?} names a chapter, not a verse"),
  }
}

// ─── Plan summary ─────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct PlanStatus {
  plan_type:            ReadingPlanType,
  name:                 String,
  description:          String,
  start_date:           NaiveDate,
  current_day:          u32,
  max_day:              Option<u32>,
  progress_percent:     u32,
  days_remaining:       u32,
  estimated_completion: NaiveDate,
  completed:            bool,
  current_reading:      Option<String>,
  next_reading:         Option<String>,
}

impl From<&ReadingPlan> for PlanStatus {
  fn from(plan: &ReadingPlan) -> Self {
    Self {
      plan_type:            plan.plan_type,
      name:                 plan.name.clone(),
      description:          plan.description.clone(),
      start_date:           plan.start_date,
      current_day:          plan.current_day,
      max_day:              plan.max_day(),
      progress_percent:     plan.progress_percent(),
      days_remaining:       plan.days_remaining(),
      estimated_completion: plan.estimated_completion_date(),
      completed:            plan.is_completed(),
      current_reading:      plan.current_reading().map(|e| e.display_reference()),
      next_reading:         plan.next_reading().map(|e| e.display_reference()),
    }
  }
}

impl PlanStatus {
  fn render(&self) -> String {
    let mut lines = vec![
      format!("{} ({})", self.name, self.plan_type),
      format!(
        "  day {} of {}, {}% done, {} days left",
        self.current_day,
        self.max_day.unwrap_or(0),
        self.progress_percent,
        self.days_remaining
      ),
      format!(
        "  started {}, finishes {}",
        self.start_date, self.estimated_completion
      ),
    ];
    if self.completed {
      lines.push("  completed".to_string());
    }
    if let Some(reading) = &self.current_reading {
      lines.push(format!("  today: {reading}"));
    }
    if let Some(reading) = &self.next_reading {
      lines.push(format!("  next:  {reading}"));
    }
    lines.join("\n")
  }
}

// ─── App ──────────────────────────────────────────────────────────────────────

pub struct App<L, S> {
  library:             BibleLibrary<L>,
  lexicon:             Arc<LexiconIndex<L>>,
  journal:             Journal<S>,
  /// Translation used for single-verse commands.
  translation:         String,
  search_translations: Vec<String>,
}

impl<L: ResourceLoader, S: PropertyStore> App<L, S> {
  pub fn new(
    loader: Arc<L>,
    store: Arc<S>,
    translation: String,
    search_translations: Vec<String>,
  ) -> Self {
    Self {
      library: BibleLibrary::new(Arc::clone(&loader)),
      lexicon: Arc::new(LexiconIndex::new(loader)),
      journal: Journal::open(store),
      translation,
      search_translations,
    }
  }

  /// Shared handle for background preloading.
  pub fn lexicon(&self) -> Arc<LexiconIndex<L>> { Arc::clone(&self.lexicon) }

  pub fn run(&mut self, command: Command) -> Result<Output> {
    match command {
      Command::Search { words } => self.search(&words.join(" ")),
      Command::Verse { reference } => self.verse(&reference),
      Command::Books => {
        let lines = books::BOOKS
          .iter()
          .map(|b| format!("{:>2}  {:<16} {:>3}", b.number, b.name, b.chapters))
          .collect();
        Output::lines(&books::BOOKS[..], lines)
      }
      Command::Chapters { book } => {
        let book = parse_book(&book)?;
        let chapters = self.library.chapters_for_book(book)?;
        let text = chapters
          .iter()
          .map(u32::to_string)
          .collect::<Vec<_>>()
          .join(" ");
        Output::new(&chapters, text)
      }
      Command::Strongs { id } => self.strongs(&id),
      Command::Define { reference, word } => {
        let key = parse_verse(&reference)?;
        let definition =
          self
            .lexicon
            .word_definition(key.book, key.chapter, key.verse, word);
        let text = if definition.is_empty() {
          format!("no definition for word {word} of {}", key.display_reference())
        } else {
          definition.clone()
        };
        Output::new(
          &json!({
            "reference": key.display_reference(),
            "word": word,
            "definition": definition,
          }),
          text,
        )
      }
      Command::Note(cmd) => self.note(cmd),
      Command::Read(cmd) => self.read(cmd),
      Command::Xref(cmd) => self.xref(cmd),
      Command::Plan(cmd) => self.plan(cmd),
    }
  }

  // ── Text ──────────────────────────────────────────────────────────────────

  fn search(&self, query: &str) -> Result<Output> {
    let bibles = self
      .library
      .load_all(&self.search_translations)
      .context("loading translations for search")?;
    let results = search(query, bibles.iter().map(|bible| bible.as_ref()));
    let mut lines: Vec<String> = results.iter().map(ToString::to_string).collect();
    lines.push(format!("{} result(s)", results.len()));
    Output::lines(&results, lines)
  }

  fn verse(&self, reference: &str) -> Result<Output> {
    let key = parse_verse(reference)?;
    let bible = self.library.parse_from_resource(&self.translation)?;
    let verse = bible
      .verse(key.book, key.chapter, key.verse)
      .with_context(|| {
        format!("{} is not in {}", key.display_reference(), self.translation)
      })?;

    let note = self.journal.notes.get_note(key);
    let cross_references = self.journal.cross_references.get_cross_references(key);
    let read = self.journal.reading.is_read(key);

    let mut lines = vec![
      format!("{} ({})", key.display_reference(), bible.translation),
      verse.text.clone(),
    ];
    if !note.is_empty() {
      lines.push(format!("note: {note}"));
    }
    if !cross_references.is_empty() {
      lines.push(format!("see: {}", cross_references.join("; ")));
    }
    Output::lines(
      &json!({
        "reference": key.display_reference(),
        "translation": bible.translation,
        "text": verse.text,
        "phonetics": verse.phonetics,
        "note": note,
        "cross_references": cross_references,
        "read": read,
      }),
      lines,
    )
  }

  fn strongs(&self, id: &str) -> Result<Output> {
    let id = match id.trim().parse::<u32>() {
      Ok(number) => strongs_id(number),
      Err(_) => id.trim().to_lowercase(),
    };
    let entry = self
      .lexicon
      .get_lexicon_entry_by_strongs(&id)?
      .with_context(|| format!("no lexicon entry {id}"))?;
    let text = format!(
      "{} {} ({}) [{}]\n{}\nusage: {}\norigin: {}",
      entry.strong,
      entry.transliteration,
      entry.phonetic,
      entry.part_of_speech,
      entry.definition,
      entry.usage,
      entry.origin
    );
    Output::new(&entry, text)
  }

  // ── Notes ─────────────────────────────────────────────────────────────────

  fn note(&mut self, cmd: NoteCommand) -> Result<Output> {
    let notes = &mut self.journal.notes;
    match cmd {
      NoteCommand::Get { reference } => {
        let key = parse_verse(&reference)?;
        let note = notes.get_note(key);
        Output::new(note, note)
      }
      NoteCommand::Set { reference, text } => {
        let key = parse_verse(&reference)?;
        notes.set_note(key, &text.join(" "));
        let saved = notes.get_note(key);
        let text = if saved.is_empty() {
          format!("removed note on {}", key.display_reference())
        } else {
          format!("saved note on {}", key.display_reference())
        };
        Output::new(saved, text)
      }
      NoteCommand::Remove { reference } => {
        let key = parse_verse(&reference)?;
        let had = notes.has_note(key);
        notes.remove_note(key);
        Output::new(&had, if had { "removed" } else { "no note" })
      }
      NoteCommand::List => {
        let items = notes.all_notes();
        let lines = items
          .iter()
          .map(|n| format!("{}: {}", n.reference, n.text))
          .collect();
        Output::lines(&items, lines)
      }
      NoteCommand::Search { query } => {
        let items = notes.search_notes(&query.join(" "));
        let lines = items
          .iter()
          .map(|n| format!("{}: {}", n.reference, n.text))
          .collect();
        Output::lines(&items, lines)
      }
    }
  }

  // ── Reading ───────────────────────────────────────────────────────────────

  fn read(&mut self, cmd: ReadCommand) -> Result<Output> {
    match cmd {
      ReadCommand::Mark { reference, date } => {
        let date = date.unwrap_or_else(today);
        let keys = self.passage_keys(&reference)?;
        let mut advanced = BTreeSet::new();
        for key in &keys {
          advanced.extend(self.journal.mark_as_read_on(*key, date));
        }

        let mut lines = vec![format!("marked {} verse(s) read on {date}", keys.len())];
        for plan_type in &advanced {
          if let Some(plan) = self.journal.plans.get_plan(*plan_type) {
            lines.push(format!("{} advanced to day {}", plan.name, plan.current_day));
          }
        }
        Output::lines(
          &json!({ "marked": keys, "date": date, "advanced_plans": advanced }),
          lines,
        )
      }
      ReadCommand::Check { reference } => {
        let reading = &self.journal.reading;
        let (book, chapter, verse) = parse_passage(&reference)?;
        let read = match verse {
          Some(verse) => reading.is_read(VerseKey::new(book, chapter, verse)),
          None => reading.is_chapter_read(book, chapter),
        };
        Output::new(&read, if read { "read" } else { "not read" })
      }
      ReadCommand::Stats => {
        let stats = self.journal.reading.statistics();
        let text = format!(
          "chapters read:    {}\nbooks started:    {}\nbooks completed:  {}\ncurrent streak:   {} day(s)\nchapters per day: {:.1}",
          stats.total_chapters_read,
          stats.total_books_started,
          stats.total_books_completed,
          stats.current_streak,
          stats.average_chapters_per_day
        );
        Output::new(&stats, text)
      }
      ReadCommand::Sections => {
        let sections = self.journal.reading.read_sections();
        let lines = sections
          .iter()
          .map(|(book, chapters)| {
            let name = books::book_name(*book).unwrap_or("?");
            let chapters: Vec<String> = chapters.iter().map(u32::to_string).collect();
            format!("{name}: {}", chapters.join(", "))
          })
          .collect();
        Output::lines(&sections, lines)
      }
      ReadCommand::Reset => {
        self.journal.reading.reset_reading_status();
        Output::new(&true, "reading progress cleared")
      }
    }
  }

  /// The verse keys a reference covers: one verse, or every verse of a
  /// chapter in the current translation.
  fn passage_keys(&self, reference: &str) -> Result<Vec<VerseKey>> {
    let (book, chapter, verse) = parse_passage(reference)?;
    if let Some(verse) = verse {
      return Ok(vec![VerseKey::new(book, chapter, verse)]);
    }
    let bible = self.library.parse_from_resource(&self.translation)?;
    let chapter = bible.chapter(book, chapter).with_context(|| {
      format!("{reference:?} is not in {}", self.translation)
    })?;
    Ok(
      chapter
        .verses
        .iter()
        .map(|v| VerseKey::new(book, chapter.number, v.number))
        .collect(),
    )
  }

  // ── Cross-references ──────────────────────────────────────────────────────

  fn xref(&mut self, cmd: XrefCommand) -> Result<Output> {
    let xrefs = &mut self.journal.cross_references;
    match cmd {
      XrefCommand::List { reference } => {
        let key = parse_verse(&reference)?;
        let list = xrefs.get_cross_references(key);
        Output::lines(list, list.to_vec())
      }
      XrefCommand::Add { reference, target } => {
        let key = parse_verse(&reference)?;
        let changed = xrefs.add_cross_reference(key, &target)?;
        Output::new(&changed, if changed { "added" } else { "already listed" })
      }
      XrefCommand::Remove { reference, target } => {
        let key = parse_verse(&reference)?;
        let changed = xrefs.remove_cross_reference(key, target.trim());
        Output::new(&changed, if changed { "removed" } else { "not listed" })
      }
    }
  }

  // ── Plans ─────────────────────────────────────────────────────────────────

  fn plan(&mut self, cmd: PlanCommand) -> Result<Output> {
    let plans = &mut self.journal.plans;
    match cmd {
      PlanCommand::Start { kind, start } => {
        let plan = plans.start_plan(kind.into(), start.unwrap_or_else(today));
        let status = PlanStatus::from(plan);
        Output::new(&status, status.render())
      }
      PlanCommand::Custom {
        name,
        description,
        start,
        entries,
      } => {
        let entries = entries
          .iter()
          .flat_map(|arg| arg.split(';'))
          .filter(|s| !s.trim().is_empty())
          .map(|s| s.parse::<ReadingPlanEntry>())
          .collect::<Result<Vec<_>, _>>()?;
        let plan = plans.start_custom_plan(
          &name,
          &description,
          entries,
          start.unwrap_or_else(today),
        )?;
        let status = PlanStatus::from(plan);
        Output::new(&status, status.render())
      }
      PlanCommand::Status { kind } => {
        let statuses: Vec<PlanStatus> = match kind {
          Some(kind) => {
            let plan_type = ReadingPlanType::from(kind);
            let plan = plans
              .get_plan(plan_type)
              .with_context(|| format!("no {plan_type} plan"))?;
            vec![PlanStatus::from(plan)]
          }
          None => plans.all_plans().map(PlanStatus::from).collect(),
        };
        let lines = statuses.iter().map(PlanStatus::render).collect();
        Output::lines(&statuses, lines)
      }
      PlanCommand::List => {
        let statuses: Vec<PlanStatus> = plans.all_plans().map(PlanStatus::from).collect();
        let lines = statuses
          .iter()
          .map(|s| format!("{:<25} {} (day {})", s.plan_type, s.name, s.current_day))
          .collect();
        Output::lines(&statuses, lines)
      }
      PlanCommand::Remove { kind } => {
        let plan_type = ReadingPlanType::from(kind);
        if !plans.remove_plan(plan_type) {
          bail!("no {plan_type} plan");
        }
        Output::new(&plan_type, format!("removed {plan_type} plan"))
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use lectio_core::resource::MemoryResources;
  use lectio_store_fs::MemoryStore;

  use super::*;
  use crate::command::PlanKind;

  const KJV: &str = r#"<bible><testament name="New">
    <book number="43">
      <chapter number="3">
        <verse number="16">For God so loved the world</verse>
        <verse number="17">For God sent not his Son into the world to condemn the world</verse>
      </chapter>
    </book>
    <book number="45"><chapter number="5"><verse number="2">access by faith into this grace</verse></chapter></book>
  </testament></bible>"#;

  const LEXICON: &str = r#"{"g2316": {"strong": "g2316", "part_of_speech": "noun",
    "transliteration": "theos", "phonetic": "theh'-os", "definition": "a deity",
    "usage": "God", "origin": "of uncertain affinity"}}"#;

  const MAPPING: &str = "4.3.16 For 1063 CONJ God 2316 N-NSM\n";

  fn app() -> App<MemoryResources, MemoryStore> {
    let resources = MemoryResources::new()
      .with("English KJV", "xml", KJV)
      .with("lexicon", "json", LEXICON)
      .with("strongs_mapping", "txt", MAPPING);
    App::new(
      Arc::new(resources),
      Arc::new(MemoryStore::new()),
      "English KJV".to_string(),
      vec!["English KJV".to_string()],
    )
  }

  #[test]
  fn references_parse_in_every_form() {
    assert_eq!(parse_verse("43:3:16").unwrap(), VerseKey::new(43, 3, 16));
    assert_eq!(parse_verse("John 3:16").unwrap(), VerseKey::new(43, 3, 16));
    assert_eq!(parse_verse("1 john 1:9").unwrap(), VerseKey::new(62, 1, 9));
    assert_eq!(parse_passage("Romans 8").unwrap(), (45, 8, None));
    assert!(parse_verse("Romans 8").is_err());
    assert!(parse_verse("Hezekiah 1:1").is_err());
    assert!(parse_book("67").is_err());
  }

  #[test]
  fn verse_shows_text_and_journal_state() {
    let mut app = app();
    app
      .run(Command::Note(NoteCommand::Set {
        reference: "John 3:16".into(),
        text:      vec!["so".into(), "loved".into()],
      }))
      .unwrap();

    let out = app.run(Command::Verse { reference: "John 3:16".into() }).unwrap();
    assert!(out.text.contains("For God so loved the world"));
    assert!(out.text.contains("note: so loved"));
    assert_eq!(out.json["translation"], "English KJV");
    assert_eq!(out.json["read"], false);
  }

  #[test]
  fn search_and_definitions() {
    let mut app = app();
    let out = app.run(Command::Search { words: vec!["grace".into()] }).unwrap();
    assert_eq!(out.json.as_array().unwrap().len(), 1);
    assert_eq!(out.json[0]["reference"], "Romans 5:2");

    let out = app
      .run(Command::Define {
        reference: "John 3:16".into(),
        word:      1,
      })
      .unwrap();
    assert_eq!(out.text, "Strong's: a deity");

    let out = app.run(Command::Strongs { id: "2316".into() }).unwrap();
    assert_eq!(out.json["transliteration"], "theos");
  }

  #[test]
  fn marking_a_chapter_advances_a_plan() {
    let mut app = app();
    app
      .run(Command::Plan(PlanCommand::Custom {
        name:        "John".into(),
        description: String::new(),
        start:       None,
        entries:     vec!["1:43:3:3;2:43:4:4".into()],
      }))
      .unwrap();

    let out = app
      .run(Command::Read(ReadCommand::Mark {
        reference: "John 3".into(),
        date:      None,
      }))
      .unwrap();
    assert_eq!(out.json["marked"].as_array().unwrap().len(), 2);
    assert_eq!(out.json["advanced_plans"][0], "Custom");

    let out = app
      .run(Command::Plan(PlanCommand::Status {
        kind: Some(PlanKind::Custom),
      }))
      .unwrap();
    assert_eq!(out.json[0]["current_day"], 2);

    let out = app
      .run(Command::Read(ReadCommand::Check {
        reference: "John 3".into(),
      }))
      .unwrap();
    assert_eq!(out.json, true);
  }

  #[test]
  fn unstorable_input_is_refused() {
    let mut app = app();
    assert!(
      app
        .run(Command::Plan(PlanCommand::Custom {
          name:        "Backwards".into(),
          description: String::new(),
          start:       None,
          entries:     vec!["1:43:4:3".into()],
        }))
        .is_err()
    );
    assert!(app.journal.plans.get_plan(ReadingPlanType::Custom).is_none());

    assert!(
      app
        .run(Command::Xref(XrefCommand::Add {
          reference: "John 3:16".into(),
          target:    "Gen 1:1|Prov 8:22".into(),
        }))
        .is_err()
    );
    let out = app
      .run(Command::Xref(XrefCommand::List {
        reference: "John 3:16".into(),
      }))
      .unwrap();
    assert_eq!(out.json, json!([]));
  }

  #[test]
  fn removing_a_missing_plan_is_an_error() {
    let mut app = app();
    assert!(
      app
        .run(Command::Plan(PlanCommand::Remove {
          kind: PlanKind::BibleInAYear,
        }))
        .is_err()
    );
  }
}

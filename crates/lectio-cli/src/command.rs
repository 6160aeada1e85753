//! Command-line surface.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use lectio_trackers::ReadingPlanType;

#[derive(Parser, Debug)]
#[command(
  name = "lectio",
  author,
  version,
  about = "Bible texts, Strong's lexicon and a reading journal"
)]
pub struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
  pub config: PathBuf,

  /// Print results as JSON.
  #[arg(long, global = true)]
  pub json: bool,

  /// Translation to read from instead of the configured default.
  #[arg(short, long, global = true, value_name = "ID")]
  pub translation: Option<String>,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Case-insensitive substring search across the configured translations.
  Search {
    #[arg(required = true, num_args = 1..)]
    words: Vec<String>,
  },

  /// Print one verse, e.g. `lectio verse "John 3:16"` or `lectio verse 43:3:16`.
  Verse { reference: String },

  /// The canonical book table.
  Books,

  /// Chapter numbers of a book in the reference translation.
  Chapters { book: String },

  /// Look up a Strong's entry by id (`g0976`) or number (`976`).
  Strongs { id: String },

  /// Definition of the n-th word (from 0) of a New Testament verse.
  Define { reference: String, word: usize },

  /// Notes attached to verses.
  #[command(subcommand)]
  Note(NoteCommand),

  /// Reading progress and statistics.
  #[command(subcommand)]
  Read(ReadCommand),

  /// Cross-references between verses.
  #[command(subcommand)]
  Xref(XrefCommand),

  /// Reading plans.
  #[command(subcommand)]
  Plan(PlanCommand),
}

#[derive(Subcommand, Debug)]
pub enum NoteCommand {
  Get { reference: String },
  /// Replace the note; an empty text removes it.
  Set { reference: String, text: Vec<String> },
  Remove { reference: String },
  List,
  /// Match note text or reference; no query lists every note.
  Search { query: Vec<String> },
}

#[derive(Subcommand, Debug)]
pub enum ReadCommand {
  /// Mark verses read. A chapter reference (`John 3`) marks every verse of
  /// the chapter in the current translation.
  Mark {
    reference: String,
    /// Date read, `YYYY-MM-DD`; today when omitted.
    #[arg(long)]
    date:      Option<NaiveDate>,
  },
  Check { reference: String },
  Stats,
  Sections,
  /// Forget all reading progress.
  Reset,
}

#[derive(Subcommand, Debug)]
pub enum XrefCommand {
  List { reference: String },
  Add { reference: String, target: String },
  Remove { reference: String, target: String },
}

#[derive(Subcommand, Debug)]
pub enum PlanCommand {
  /// Start (or restart) a generated plan.
  Start {
    kind:  PlanKind,
    #[arg(long)]
    start: Option<NaiveDate>,
  },
  /// Start (or replace) the custom plan from `day:book:first:last` entries.
  Custom {
    #[arg(long)]
    name:        String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long)]
    start:       Option<NaiveDate>,
    #[arg(required = true, num_args = 1..)]
    entries:     Vec<String>,
  },
  /// Progress of one plan, or of every plan.
  Status { kind: Option<PlanKind> },
  List,
  Remove { kind: PlanKind },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlanKind {
  BibleInAYear,
  NewTestament,
  Custom,
}

impl From<PlanKind> for ReadingPlanType {
  fn from(kind: PlanKind) -> Self {
    match kind {
      PlanKind::BibleInAYear => Self::BibleInAYear,
      PlanKind::NewTestament => Self::NewTestamentIn90Days,
      PlanKind::Custom => Self::Custom,
    }
  }
}

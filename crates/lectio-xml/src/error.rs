//! Error types for the lectio-xml ingestion layer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("resource error: {0}")]
  Resource(#[from] lectio_core::Error),

  #[error("malformed XML at byte {position}: {message}")]
  Xml { position: u64, message: String },

  #[error("document has no root element")]
  EmptyDocument,

  #[error("document ended inside <{0}>")]
  UnexpectedEof(&'static str),

  #[error("<{element}> is missing required attribute {attribute:?}")]
  MissingAttribute {
    element:   &'static str,
    attribute: &'static str,
  },

  #[error("<{element}> attribute {attribute:?} is not a number: {value:?}")]
  InvalidNumber {
    element:   &'static str,
    attribute: &'static str,
    value:     String,
  },

  #[error("unknown testament name: {0:?}")]
  InvalidTestament(String),

  #[error("book number {0} is not a canonical book (1-66)")]
  UnknownBook(u32),

  #[error("book {0} appears more than once")]
  DuplicateBook(u32),

  #[error("book {book} belongs to the {expected} Testament, found under {found}")]
  WrongTestament {
    book:     u32,
    expected: lectio_core::model::TestamentName,
    found:    lectio_core::model::TestamentName,
  },

  #[error("<{element}> found outside <{parent}>")]
  Misplaced {
    element: &'static str,
    parent:  &'static str,
  },
}

impl Error {
  /// Whether the underlying resource was missing, as opposed to unreadable
  /// or malformed.
  pub fn is_not_found(&self) -> bool {
    matches!(
      self,
      Self::Resource(lectio_core::Error::ResourceNotFound { .. })
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

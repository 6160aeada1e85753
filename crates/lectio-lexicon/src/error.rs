//! Error types for the lexicon loaders.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("resource error: {0}")]
  Resource(#[from] lectio_core::Error),

  #[error("lexicon JSON error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("strong's mapping is not valid UTF-8: {0}")]
  Encoding(#[from] std::str::Utf8Error),

  #[error("strong's mapping line {line}: invalid reference {reference:?}")]
  InvalidReference { line: usize, reference: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

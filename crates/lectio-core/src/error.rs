//! Error types for `lectio-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("resource not found: {id} (tried: {path})")]
  ResourceNotFound { id: String, path: String },

  #[error("failed to read resource {id}: {source}")]
  ResourceIo {
    id:     String,
    #[source]
    source: std::io::Error,
  },

  #[error("invalid verse key: {0:?}")]
  InvalidVerseKey(String),

  #[error("unknown testament name: {0:?}")]
  UnknownTestament(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

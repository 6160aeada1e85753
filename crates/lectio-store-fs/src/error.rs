//! Error type for `lectio-store-fs`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("io error on {path}: {source}")]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("invalid property file name: {0:?}")]
  InvalidFileName(String),

  #[error("writes are disabled for this store")]
  ReadOnly,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

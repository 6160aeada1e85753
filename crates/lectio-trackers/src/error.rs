//! Error type for `lectio-trackers`.
//!
//! Load problems start from empty state and save problems are logged, so
//! these errors only surface from parsing helpers and from input that could
//! not be stored faithfully.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown reading plan type: {0:?}")]
  UnknownPlanType(String),

  #[error("invalid reading plan entry: {0:?}")]
  InvalidPlanEntry(String),

  #[error("invalid cross reference: {0:?}")]
  InvalidCrossReference(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

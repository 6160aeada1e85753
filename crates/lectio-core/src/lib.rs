//! Core types and trait definitions for Lectio.
//!
//! This crate holds the Bible document model, the canonical book table, the
//! composite verse key used by every tracker, and the two collaborator traits
//! the rest of the workspace is written against: [`resource::ResourceLoader`]
//! for packaged texts and [`storage::PropertyStore`] for flat key/value
//! persistence. It does no file-system or XML work of its own.

pub mod books;
pub mod error;
pub mod model;
pub mod reference;
pub mod resource;
pub mod search;
pub mod storage;

pub use error::{Error, Result};
pub use reference::VerseKey;

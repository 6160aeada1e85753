//! Bible XML ingestion for Lectio.
//!
//! Turns a packaged Bible XML resource into the [`lectio_core::model`]
//! document tree, and keeps parsed documents in a [`BibleLibrary`] so that
//! repeated loads of the same translation are free.
//!
//! # Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use lectio_core::resource::MemoryResources;
//! use lectio_xml::BibleLibrary;
//!
//! let resources = MemoryResources::new().with("English KJV", "xml", "<bible/>");
//! let library = BibleLibrary::new(Arc::new(resources));
//! let kjv = library.parse_from_resource("English KJV").unwrap();
//! println!("{} verses", kjv.verse_count());
//! ```

pub mod error;
mod library;
mod parse;

pub use error::{Error, Result};
pub use library::{BibleLibrary, REFERENCE_TRANSLATION};
use lectio_core::model::Bible;

/// Parse a Bible XML document.
///
/// The `translation` attribute of the root element is kept as-is; callers
/// loading through [`BibleLibrary`] get it replaced by the lookup key.
/// Parsing is all-or-nothing: any structural problem is an error and no
/// partial tree is returned.
pub fn parse_bible(xml: &[u8]) -> Result<Bible> { parse::parse_bible(xml) }

//! Strong's lexicon support for Lectio.
//!
//! Two packaged resources feed this crate: `lexicon.json`, a dictionary of
//! Strong's entries, and `strongs_mapping.txt`, which gives the Strong's
//! number of every word of every New Testament verse. [`LexiconIndex`]
//! loads both on first use and answers lookups from in-memory hash maps.

pub mod entry;
pub mod error;
mod index;
pub mod mapping;

pub use entry::{LexiconDictionary, LexiconEntry, load_lexicon, strongs_id};
pub use error::{Error, Result};
pub use index::{DEFINITION_LABEL, LexiconIndex, mapping_book};
pub use mapping::{StrongsMappingVerse, load_strongs_mapping, parse_strongs_mapping};

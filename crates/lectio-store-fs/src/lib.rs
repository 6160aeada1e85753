//! File-system backends for Lectio.
//!
//! - [`FsPropertyStore`] persists tracker state as Java-style `.properties`
//!   files in a data directory, one file per tracker.
//! - [`MemoryStore`] keeps the same maps in memory, for tests and throwaway
//!   sessions.
//! - [`DirResourceLoader`] serves packaged Bible, lexicon and mapping files
//!   from a directory.

mod fs_store;
mod memory;
pub mod properties;
mod resources;

pub mod error;

pub use error::{Error, Result};
pub use fs_store::{DEFAULT_PREFIX, FsPropertyStore};
pub use memory::MemoryStore;
pub use resources::DirResourceLoader;

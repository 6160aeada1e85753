//! The file-system implementation of [`PropertyStore`].

use std::{
  fs,
  io::ErrorKind,
  path::{Path, PathBuf},
};

use chrono::Local;
use lectio_core::storage::{Properties, PropertyStore};

use crate::{Error, Result, properties};

/// Prefix prepended to every file name the store manages.
pub const DEFAULT_PREFIX: &str = ".lectio_";

const HEADER: &str = "Lectio data";

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> Error + use<> {
  let path = path.to_path_buf();
  move |source| Error::Io { path, source }
}

/// Stores each properties map as `<dir>/<prefix><filename>`.
///
/// Saves write a sibling temporary file and rename it over the target, so a
/// reader never observes a half-written file.
#[derive(Debug, Clone)]
pub struct FsPropertyStore {
  dir:    PathBuf,
  prefix: String,
}

impl FsPropertyStore {
  /// Open (or create) a store rooted at `dir`.
  pub fn open(dir: impl AsRef<Path>, prefix: impl Into<String>) -> Result<Self> {
    let dir = dir.as_ref().to_path_buf();
    fs::create_dir_all(&dir).map_err(|source| Error::Io {
      path: dir.clone(),
      source,
    })?;
    Ok(Self {
      dir,
      prefix: prefix.into(),
    })
  }

  pub fn dir(&self) -> &Path { &self.dir }

  /// Resolve `filename` to its on-disk path, adding the prefix unless the
  /// caller already included it.
  pub fn path_for(&self, filename: &str) -> Result<PathBuf> {
    if filename.is_empty()
      || filename.contains(['/', '\\'])
      || filename == "."
      || filename == ".."
    {
      return Err(Error::InvalidFileName(filename.to_string()));
    }
    let name = if filename.starts_with(&self.prefix) {
      filename.to_string()
    } else {
      format!("{}{filename}", self.prefix)
    };
    Ok(self.dir.join(name))
  }
}

impl PropertyStore for FsPropertyStore {
  type Error = Error;

  fn save_properties(&self, filename: &str, props: &Properties) -> Result<()> {
    let path = self.path_for(filename)?;
    let mut tmp = path.clone().into_os_string();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let header = format!("{HEADER}\n{}", Local::now().to_rfc2822());
    fs::write(&tmp, properties::write(props, &header)).map_err(io_err(&tmp))?;
    fs::rename(&tmp, &path).map_err(io_err(&path))?;

    tracing::debug!(path = %path.display(), entries = props.len(), "saved properties");
    Ok(())
  }

  fn load_properties(&self, filename: &str) -> Result<Properties> {
    let path = self.path_for(filename)?;
    match fs::read_to_string(&path) {
      Ok(text) => Ok(properties::parse(&text)),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(Properties::new()),
      Err(source) => Err(Error::Io { path, source }),
    }
  }

  fn file_exists(&self, filename: &str) -> bool {
    self.path_for(filename).is_ok_and(|p| p.is_file())
  }

  fn delete_file(&self, filename: &str) -> Result<bool> {
    let path = self.path_for(filename)?;
    match fs::remove_file(&path) {
      Ok(()) => Ok(true),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
      Err(source) => Err(Error::Io { path, source }),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn store() -> (tempfile::TempDir, FsPropertyStore) {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = FsPropertyStore::open(dir.path(), DEFAULT_PREFIX).unwrap();
    (dir, store)
  }

  #[test]
  fn missing_file_loads_empty() {
    let (_dir, s) = store();
    assert!(s.load_properties("notes.properties").unwrap().is_empty());
    assert!(!s.file_exists("notes.properties"));
  }

  #[test]
  fn save_then_load() {
    let (dir, s) = store();
    let mut props = Properties::new();
    props.insert("43:3:16".into(), "For God so loved".into());
    s.save_properties("notes.properties", &props).unwrap();

    assert!(dir.path().join(".lectio_notes.properties").is_file());
    assert!(s.file_exists("notes.properties"));
    assert_eq!(s.load_properties("notes.properties").unwrap(), props);
  }

  #[test]
  fn save_replaces_whole_file() {
    let (_dir, s) = store();
    let mut first = Properties::new();
    first.insert("a".into(), "1".into());
    first.insert("b".into(), "2".into());
    s.save_properties("x.properties", &first).unwrap();

    let mut second = Properties::new();
    second.insert("c".into(), "3".into());
    s.save_properties("x.properties", &second).unwrap();

    assert_eq!(s.load_properties("x.properties").unwrap(), second);
  }

  #[test]
  fn already_prefixed_names_are_not_prefixed_twice() {
    let (_dir, s) = store();
    assert_eq!(
      s.path_for(".lectio_notes.properties").unwrap(),
      s.path_for("notes.properties").unwrap()
    );
  }

  #[test]
  fn delete_reports_whether_anything_was_removed() {
    let (_dir, s) = store();
    s.save_properties("y.properties", &Properties::new()).unwrap();
    assert!(s.delete_file("y.properties").unwrap());
    assert!(!s.delete_file("y.properties").unwrap());
  }

  #[test]
  fn path_traversal_is_rejected() {
    let (_dir, s) = store();
    assert!(matches!(
      s.load_properties("../escape"),
      Err(Error::InvalidFileName(_))
    ));
  }
}

//! Serves packaged resources from a directory.

use std::{fs, io::ErrorKind, path::PathBuf};

use lectio_core::{
  Error,
  Result,
  resource::{ResourceLoader, resource_file_name},
};

/// Resolves `id` + extension to `<root>/<id without spaces>.<ext>`.
#[derive(Debug, Clone)]
pub struct DirResourceLoader {
  root: PathBuf,
}

impl DirResourceLoader {
  pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }
}

impl ResourceLoader for DirResourceLoader {
  fn load_resource_with_extension(
    &self,
    id: &str,
    extension: &str,
  ) -> Result<Vec<u8>> {
    let path = self.root.join(resource_file_name(id, extension));
    match fs::read(&path) {
      Ok(bytes) => {
        tracing::debug!(id, path = %path.display(), bytes = bytes.len(), "read resource");
        Ok(bytes)
      }
      Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::ResourceNotFound {
        id:   id.to_string(),
        path: path.display().to_string(),
      }),
      Err(source) => Err(Error::ResourceIo {
        id: id.to_string(),
        source,
      }),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn resolves_ids_without_spaces() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("EnglishKJV.xml"), "<bible/>").unwrap();
    fs::write(dir.path().join("lexicon.json"), "{}").unwrap();

    let loader = DirResourceLoader::new(dir.path());
    assert_eq!(loader.load_resource("English KJV").unwrap(), b"<bible/>");
    assert_eq!(loader.load_resource("/English KJV").unwrap(), b"<bible/>");
    assert_eq!(
      loader.load_resource_with_extension("lexicon", "json").unwrap(),
      b"{}"
    );
  }

  #[test]
  fn missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let loader = DirResourceLoader::new(dir.path());
    let err = loader.load_resource("Greek Bible").unwrap_err();
    assert!(matches!(err, Error::ResourceNotFound { ref id, .. } if id == "Greek Bible"));
  }
}

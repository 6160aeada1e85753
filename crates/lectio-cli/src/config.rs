//! Layered configuration: optional TOML file, then `LECTIO_*` environment
//! variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use lectio_store_fs::DEFAULT_PREFIX;
use lectio_xml::REFERENCE_TRANSLATION;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppConfig {
  /// Directory holding `<translation>.xml`, `lexicon.json` and
  /// `strongs_mapping.txt`.
  #[serde(default = "default_resource_dir")]
  pub resource_dir:        PathBuf,
  /// Directory the trackers write their property files to.
  #[serde(default = "default_data_dir")]
  pub data_dir:            PathBuf,
  #[serde(default = "default_file_prefix")]
  pub file_prefix:         String,
  #[serde(default = "default_translation")]
  pub default_translation: String,
  /// Translations searched together. Empty means the default translation
  /// only.
  #[serde(default)]
  pub translations:        Vec<String>,
}

fn default_resource_dir() -> PathBuf { PathBuf::from("resources") }

fn default_data_dir() -> PathBuf { PathBuf::from("~/.local/share/lectio") }

fn default_file_prefix() -> String { DEFAULT_PREFIX.to_string() }

fn default_translation() -> String { REFERENCE_TRANSLATION.to_string() }

impl AppConfig {
  /// Read `path` (if it exists) and the environment, and expand `~` in the
  /// directory settings.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("LECTIO")
          .try_parsing(true)
          .list_separator(",")
          .with_list_parse_key("translations"),
      )
      .build()
      .context("failed to read config file")?;

    let mut cfg: AppConfig = settings
      .try_deserialize()
      .context("failed to deserialise AppConfig")?;
    cfg.resource_dir = expand_tilde(&cfg.resource_dir);
    cfg.data_dir = expand_tilde(&cfg.data_dir);
    Ok(cfg)
  }

  /// The translations a search spans, default first.
  pub fn search_translations(&self) -> Vec<String> {
    let mut ids = vec![self.default_translation.clone()];
    for id in &self.translations {
      if !ids.contains(id) {
        ids.push(id.clone());
      }
    }
    ids
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use std::io::Write;

  use super::*;

  #[test]
  fn file_values_override_defaults() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
      file,
      "resource_dir = \"/srv/lectio\"\ntranslations = [\"English YLT\", \"English KJV\"]"
    )
    .unwrap();

    let cfg = AppConfig::load(file.path()).unwrap();
    assert_eq!(cfg.resource_dir, PathBuf::from("/srv/lectio"));
    assert_eq!(cfg.file_prefix, DEFAULT_PREFIX);
    assert_eq!(cfg.default_translation, "English KJV");
    assert_eq!(cfg.search_translations(), vec!["English KJV", "English YLT"]);
  }

  #[test]
  fn missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = AppConfig::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(cfg.resource_dir, PathBuf::from("resources"));
    assert!(cfg.translations.is_empty());
  }

  #[test]
  fn tilde_expands_only_at_the_start() {
    assert_eq!(expand_tilde(Path::new("/a/~/b")), PathBuf::from("/a/~/b"));
    if let Ok(home) = std::env::var("HOME") {
      assert_eq!(expand_tilde(Path::new("~/x")), PathBuf::from(home).join("x"));
    }
  }
}

//! `lectio`: read, search and annotate Bible texts from the terminal.
//!
//! # Usage
//!
//! ```text
//! lectio verse "John 3:16"
//! lectio search living water
//! lectio define "John 3:16" 4
//! lectio read mark "Romans 8"
//! lectio plan start new-testament
//! lectio --config ~/.config/lectio/config.toml --json read stats
//! ```
//!
//! Settings come from `config.toml` (or `--config`) and `LECTIO_*`
//! environment variables: `resource_dir`, `data_dir`, `file_prefix`,
//! `default_translation` and `translations`.

mod app;
mod command;
mod config;

use std::sync::Arc;

use anyhow::Context as _;
use app::App;
use clap::Parser;
use command::{Cli, Command};
use config::AppConfig;
use lectio_store_fs::{DirResourceLoader, FsPropertyStore};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let cfg = AppConfig::load(&cli.config)?;
  tracing::debug!(?cfg, "configuration loaded");

  let loader = Arc::new(DirResourceLoader::new(&cfg.resource_dir));
  let store = FsPropertyStore::open(&cfg.data_dir, cfg.file_prefix.clone())
    .with_context(|| format!("failed to open data directory {:?}", cfg.data_dir))?;

  let translation = cli
    .translation
    .clone()
    .unwrap_or_else(|| cfg.default_translation.clone());
  let mut app = App::new(
    loader,
    Arc::new(store),
    translation,
    cfg.search_translations(),
  );

  // Warm the lexicon in the background; the command may race it with its
  // own first lookup.
  let preload = matches!(cli.command, Command::Strongs { .. } | Command::Define { .. })
    .then(|| {
      let lexicon = app.lexicon();
      tokio::task::spawn_blocking(move || lexicon.preload_data())
    });

  let output = tokio::task::block_in_place(|| app.run(cli.command))?;

  if let Some(preload) = preload {
    match preload.await {
      Ok(Ok(())) => {}
      Ok(Err(err)) => tracing::warn!(%err, "lexicon preload failed"),
      Err(err) => tracing::warn!(%err, "lexicon preload task failed"),
    }
  }

  if cli.json {
    println!(
      "{}",
      serde_json::to_string_pretty(&output.json).context("rendering JSON")?
    );
  } else if !output.text.is_empty() {
    println!("{}", output.text);
  }
  Ok(())
}

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use rockola_core::domain::ids::curated_candidate_id;
use rockola_core::domain::{CuratedCatalog, CuratedSong};
use serde::Deserialize;

/// Catálogo que viaja dentro del binario.
const EMBEDDED_CATALOG: &str = include_str!("../data/curated_songs.toml");

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
  #[error("could not read catalog {path}: {source}")]
  Io { path: PathBuf, source: std::io::Error },

  #[error("malformed catalog: {0}")]
  Parse(#[from] toml::de::Error),

  #[error("invalid catalog entry #{index}: {reason}")]
  Invalid { index: usize, reason: String },
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
  #[serde(default)]
  songs: Vec<CuratedSong>,
}

pub fn embedded() -> Result<CuratedCatalog, CatalogError> {
  parse(EMBEDDED_CATALOG)
}

pub fn load_from_path(path: &Path) -> Result<CuratedCatalog, CatalogError> {
  let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io { path: path.to_path_buf(), source })?;
  let catalog = parse(&text)?;
  tracing::info!(path = %path.display(), songs = catalog.len(), "curated catalog loaded");
  Ok(catalog)
}

/// Parsea y valida un catálogo en TOML (`[[songs]]`).
///
/// La popularidad fuera de 1..=10 ya la rechaza el tipo `Popularity`; aquí se
/// comprueban títulos y artistas vacíos y entradas repetidas, es decir, que
/// producirían el mismo id de candidato.
pub fn parse(text: &str) -> Result<CuratedCatalog, CatalogError> {
  let file: CatalogFile = toml::from_str(text)?;

  let mut seen = HashSet::with_capacity(file.songs.len());
  for (index, song) in file.songs.iter().enumerate() {
    if song.title.trim().is_empty() {
      return Err(CatalogError::Invalid { index, reason: "empty title".into() });
    }
    if song.artist.trim().is_empty() {
      return Err(CatalogError::Invalid { index, reason: format!("empty artist for \"{}\"", song.title) });
    }
    if !seen.insert(curated_candidate_id(&song.title, &song.artist)) {
      return Err(CatalogError::Invalid {
        index,
        reason: format!("duplicate entry \"{}\" by {}", song.title, song.artist),
      });
    }
  }

  Ok(CuratedCatalog::new(file.songs))
}

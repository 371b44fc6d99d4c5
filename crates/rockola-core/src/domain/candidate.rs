use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::ids::curated_candidate_id;

/// Campo contra el que se compara la consulta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
  #[default]
  ByTitle,
  ByArtist,
}

impl fmt::Display for SearchMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SearchMode::ByTitle => write!(f, "title"),
      SearchMode::ByArtist => write!(f, "artist"),
    }
  }
}

impl FromStr for SearchMode {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "title" | "song" => Ok(SearchMode::ByTitle),
      "artist" => Ok(SearchMode::ByArtist),
      other => Err(format!("unknown search mode `{other}` (expected `title` or `artist`)")),
    }
  }
}

/// De dónde salió un candidato.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
  Curated,
  External,
}

/// Resultado tal cual lo devuelve el buscador externo, ya ordenado por su relevancia.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalSong {
  pub id: String,
  pub title: String,
  pub artist: String,
}

/// Una entrada de la lista de resultados que ve el cliente.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCandidate {
  pub id: String,
  pub title: String,
  pub artist: String,
  pub source: CandidateSource,
}

impl SearchCandidate {
  pub fn curated(title: &str, artist: &str) -> Self {
    Self {
      id: curated_candidate_id(title, artist),
      title: title.to_string(),
      artist: artist.to_string(),
      source: CandidateSource::Curated,
    }
  }

  pub fn is_curated(&self) -> bool {
    self.source == CandidateSource::Curated
  }

  /// Misma canción si título y artista coinciden sin distinguir mayúsculas.
  ///
  /// Los ids no sirven para esto: los externos vienen de otro espacio de nombres.
  pub fn same_song(&self, title: &str, artist: &str) -> bool {
    self.title.to_lowercase() == title.to_lowercase() && self.artist.to_lowercase() == artist.to_lowercase()
  }
}

impl From<ExternalSong> for SearchCandidate {
  fn from(song: ExternalSong) -> Self {
    Self { id: song.id, title: song.title, artist: song.artist, source: CandidateSource::External }
  }
}

impl fmt::Display for SearchCandidate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} - {}", self.title, self.artist)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn search_mode_accepts_song_alias() {
    assert_eq!("song".parse::<SearchMode>().unwrap(), SearchMode::ByTitle);
    assert_eq!(" Artist ".parse::<SearchMode>().unwrap(), SearchMode::ByArtist);
    assert!("album".parse::<SearchMode>().is_err());
  }

  #[test]
  fn same_song_ignores_case() {
    let c = SearchCandidate::curated("Jolene", "Dolly Parton");
    assert!(c.same_song("JOLENE", "dolly parton"));
    assert!(!c.same_song("Jolene", "Dolly"));
  }
}

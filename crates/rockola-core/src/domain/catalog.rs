use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Prioridad manual de una canción curada, en la escala `[1, 10]`.
///
/// Se usa como desempate en el ranking: `popularity / 100` se suma a la
/// similitud, así que como mucho aporta `+0.10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Popularity(u8);

impl Popularity {
  pub const MIN: u8 = 1;
  pub const MAX: u8 = 10;

  /// Devuelve `None` si el valor cae fuera de `[1, 10]`.
  pub fn new(value: u8) -> Option<Self> {
    if (Self::MIN..=Self::MAX).contains(&value) { Some(Self(value)) } else { None }
  }

  pub fn get(&self) -> u8 {
    self.0
  }

  /// Bonus de ranking asociado a esta popularidad.
  pub fn prior(&self) -> f64 {
    f64::from(self.0) / 100.0
  }
}

impl TryFrom<u8> for Popularity {
  type Error = String;

  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Popularity::new(value)
      .ok_or_else(|| format!("popularity {value} out of range [{}, {}]", Self::MIN, Self::MAX))
  }
}

impl From<Popularity> for u8 {
  fn from(p: Popularity) -> Self {
    p.0
  }
}

impl fmt::Display for Popularity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/10", self.0)
  }
}

/// Canción del catálogo curado del local.
///
/// No tiene identidad propia más allá de `title` + `artist`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuratedSong {
  pub title: String,
  pub artist: String,
  /// Etiqueta de género/ocasión ("Line Dance", "Two-Step", ...). Solo informativa.
  pub category: String,
  pub popularity: Popularity,
  /// Grafías alternativas y apodos que también se comparan contra la consulta.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub search_terms: Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
}

/// Catálogo curado inmutable.
///
/// Clonarlo es barato (comparte el mismo `Arc`), así que se inyecta por valor
/// en cada servicio que lo necesite.
#[derive(Debug, Clone, Default)]
pub struct CuratedCatalog {
  songs: Arc<[CuratedSong]>,
}

impl CuratedCatalog {
  pub fn new(songs: Vec<CuratedSong>) -> Self {
    Self { songs: songs.into() }
  }

  pub fn songs(&self) -> &[CuratedSong] {
    &self.songs
  }

  pub fn iter(&self) -> std::slice::Iter<'_, CuratedSong> {
    self.songs.iter()
  }

  pub fn len(&self) -> usize {
    self.songs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.songs.is_empty()
  }
}

impl From<Vec<CuratedSong>> for CuratedCatalog {
  fn from(songs: Vec<CuratedSong>) -> Self {
    Self::new(songs)
  }
}

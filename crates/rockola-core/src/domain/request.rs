use serde::{Deserialize, Serialize};

use crate::domain::ids::request_song_id;

/// Origen que se declara en cada petición enviada desde el kiosko.
pub const REQUEST_SOURCE: &str = "customer_interface";

/// Artista que se asume cuando el cliente escribe solo el título.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Petición ya validada, lista para enviarse al sistema del local.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongRequest {
  pub title: String,
  pub artist: String,
  pub song_id: String,
  pub venue: String,
  /// Milisegundos desde epoch.
  pub timestamp: u64,
  pub source: String,
}

impl SongRequest {
  pub fn new(title: &str, artist: &str, venue: &str, timestamp: u64) -> Self {
    Self {
      title: title.to_string(),
      artist: artist.to_string(),
      song_id: request_song_id(title, artist),
      venue: venue.to_string(),
      timestamp,
      source: REQUEST_SOURCE.to_string(),
    }
  }
}

/// Respuesta del sistema del local a una petición.
///
/// `accepted == false` es un rechazo legítimo (p. ej. canción vetada), no un
/// fallo de transporte.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubmissionOutcome {
  pub accepted: bool,
  pub message: Option<String>,
}

/// Entrada escrita a mano por el cliente cuando no elige un resultado.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualEntry {
  pub title: String,
  pub artist: String,
}

impl ManualEntry {
  /// Interpreta `"Título - Artista"`.
  ///
  /// Se corta por el primer `" - "`; el resto (aunque contenga más guiones)
  /// es el artista. Sin separador, todo es título y el artista queda como
  /// [`UNKNOWN_ARTIST`]. Devuelve `None` si no queda título.
  pub fn parse(input: &str) -> Option<Self> {
    let trimmed = input.trim();

    let (title, artist) = match trimmed.split_once(" - ") {
      Some((title, rest)) => (title.trim(), rest.trim()),
      None => (trimmed, UNKNOWN_ARTIST),
    };

    if title.is_empty() {
      return None;
    }

    let artist = if artist.is_empty() { UNKNOWN_ARTIST } else { artist };
    Some(Self { title: title.to_string(), artist: artist.to_string() })
  }
}

//! Adapters HTTP del kiosko: búsqueda en MusicBrainz, envío al panel del DJ y
//! datos curiosos con Gemini.

pub mod config;
mod gemini;
mod musicbrainz;
mod venue_api;

pub use config::{FunFactConfig, GEMINI_API_KEY_ENV, MusicBrainzConfig, VenueApiConfig};
pub use gemini::{GeminiFunFacts, extract_text, prompt};
pub use musicbrainz::{MusicBrainzClient, lucene_query, parse_recordings};
pub use venue_api::{VenueApiClient, parse_response, rfc3339_millis};

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
  #[error("http client error: {0}")]
  Client(#[from] reqwest::Error),
}

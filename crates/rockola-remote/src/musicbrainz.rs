use async_trait::async_trait;
use serde::Deserialize;

use rockola_core::domain::{ExternalSong, SearchMode, UNKNOWN_ARTIST};
use rockola_core::ports::{SearchProviderError, SongSearchProvider};

use crate::RemoteError;
use crate::config::MusicBrainzConfig;

// Respuesta de `/recording/?fmt=json`; solo lo que se muestra en el kiosko.

#[derive(Debug, Deserialize)]
struct MbSearchResponse {
  #[serde(default)]
  recordings: Vec<MbRecording>,
}

#[derive(Debug, Deserialize)]
struct MbRecording {
  id: String,
  title: String,
  #[serde(rename = "artist-credit", default)]
  artist_credit: Vec<MbArtistCredit>,
}

#[derive(Debug, Deserialize)]
struct MbArtistCredit {
  name: Option<String>,
}

impl MbRecording {
  fn into_song(self) -> ExternalSong {
    let names: Vec<&str> = self.artist_credit.iter().filter_map(|c| c.name.as_deref()).collect();
    let artist = if names.is_empty() { UNKNOWN_ARTIST.to_string() } else { names.join(", ") };
    ExternalSong { id: self.id, title: self.title, artist }
  }
}

/// Buscador de grabaciones en MusicBrainz.
pub struct MusicBrainzClient {
  http: reqwest::Client,
  config: MusicBrainzConfig,
}

impl MusicBrainzClient {
  pub fn new(config: MusicBrainzConfig) -> Result<Self, RemoteError> {
    let http = reqwest::Client::builder().user_agent(config.user_agent.as_str()).timeout(config.timeout()).build()?;
    Ok(Self { http, config })
  }

  fn endpoint(&self) -> String {
    format!("{}/recording/", self.config.base_url.trim_end_matches('/'))
  }
}

/// Consulta Lucene de frase exacta sobre el campo que toca.
pub fn lucene_query(query: &str, mode: SearchMode) -> String {
  let field = match mode {
    SearchMode::ByTitle => "recording",
    SearchMode::ByArtist => "artist",
  };

  let mut escaped = String::with_capacity(query.len());
  for c in query.trim().chars() {
    if matches!(c, '"' | '\\') {
      escaped.push('\\');
    }
    escaped.push(c);
  }

  format!("{field}:\"{escaped}\"")
}

/// Convierte el cuerpo JSON de una búsqueda en canciones, en el orden recibido.
pub fn parse_recordings(body: &str) -> Result<Vec<ExternalSong>, SearchProviderError> {
  let response: MbSearchResponse =
    serde_json::from_str(body).map_err(|e| SearchProviderError::Malformed(e.to_string()))?;
  Ok(response.recordings.into_iter().map(MbRecording::into_song).collect())
}

#[async_trait]
impl SongSearchProvider for MusicBrainzClient {
  async fn search(&self, query: &str, mode: SearchMode) -> Result<Vec<ExternalSong>, SearchProviderError> {
    if query.trim().is_empty() {
      return Ok(Vec::new());
    }

    let lucene = lucene_query(query, mode);
    let limit = self.config.limit.to_string();
    tracing::debug!(query = %lucene, limit = %limit, "MusicBrainz recording search");

    let response = self
      .http
      .get(self.endpoint())
      .query(&[("query", lucene.as_str()), ("fmt", "json"), ("limit", limit.as_str())])
      .header("Accept", "application/json")
      .send()
      .await
      .map_err(|e| SearchProviderError::Network(e.to_string()))?;

    let status = response.status();
    let body = response.text().await.map_err(|e| SearchProviderError::Network(e.to_string()))?;

    if !status.is_success() {
      tracing::warn!(%status, "MusicBrainz error response");
      return Err(SearchProviderError::Status { status: status.as_u16(), message: body });
    }

    parse_recordings(&body)
  }
}

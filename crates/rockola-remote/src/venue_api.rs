use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use rockola_core::domain::{SongRequest, SubmissionOutcome};
use rockola_core::ports::{RequestSubmitter, SubmissionError};

use crate::RemoteError;
use crate::config::VenueApiConfig;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestBody<'a> {
  title: &'a str,
  artist: &'a str,
  song_id: &'a str,
  venue: &'a str,
  timestamp: String,
  source: &'a str,
}

#[derive(Debug, Deserialize)]
struct AcceptedBody {
  #[serde(default)]
  success: bool,
  message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
  error: Option<String>,
}

/// Envía las peticiones al panel del DJ (`POST /api/dj/requests`).
pub struct VenueApiClient {
  http: reqwest::Client,
  config: VenueApiConfig,
}

impl VenueApiClient {
  pub fn new(config: VenueApiConfig) -> Result<Self, RemoteError> {
    let http = reqwest::Client::builder().timeout(config.timeout()).build()?;
    Ok(Self { http, config })
  }

  pub fn venue_id(&self) -> &str {
    &self.config.venue_id
  }

  fn endpoint(&self) -> String {
    format!("{}/api/dj/requests", self.config.api_url.trim_end_matches('/'))
  }
}

/// Milisegundos desde epoch en RFC 3339 con milisegundos y `Z`.
pub fn rfc3339_millis(timestamp_ms: u64) -> Option<String> {
  let millis = i64::try_from(timestamp_ms).ok()?;
  DateTime::<Utc>::from_timestamp_millis(millis).map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn request_body(request: &SongRequest) -> Result<RequestBody<'_>, SubmissionError> {
  let timestamp = rfc3339_millis(request.timestamp)
    .ok_or_else(|| SubmissionError::Malformed(format!("timestamp out of range: {}", request.timestamp)))?;

  Ok(RequestBody {
    title: &request.title,
    artist: &request.artist,
    song_id: &request.song_id,
    venue: &request.venue,
    timestamp,
    source: &request.source,
  })
}

/// Interpreta la respuesta del panel a partir del código y el cuerpo.
pub fn parse_response(status: u16, body: &str) -> Result<SubmissionOutcome, SubmissionError> {
  if !(200..300).contains(&status) {
    let message = serde_json::from_str::<ErrorBody>(body)
      .ok()
      .and_then(|b| b.error)
      .unwrap_or_else(|| "Unknown error".to_string());
    return Err(SubmissionError::Status { status, message });
  }

  let accepted: AcceptedBody = serde_json::from_str(body).map_err(|e| SubmissionError::Malformed(e.to_string()))?;
  Ok(SubmissionOutcome { accepted: accepted.success, message: accepted.message })
}

#[async_trait]
impl RequestSubmitter for VenueApiClient {
  async fn submit(&self, request: &SongRequest) -> Result<SubmissionOutcome, SubmissionError> {
    let body = request_body(request)?;
    tracing::info!(url = %self.endpoint(), song_id = %request.song_id, venue = %request.venue, "sending request");

    let response = self
      .http
      .post(self.endpoint())
      .json(&body)
      .send()
      .await
      .map_err(|e| SubmissionError::Network(e.to_string()))?;

    let status = response.status();
    let text = response.text().await.map_err(|e| SubmissionError::Network(e.to_string()))?;
    tracing::debug!(%status, "venue response");

    parse_response(status.as_u16(), &text)
  }
}

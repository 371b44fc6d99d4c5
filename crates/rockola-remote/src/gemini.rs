use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use rockola_core::ports::{FunFactError, FunFactProvider};

use crate::RemoteError;
use crate::config::FunFactConfig;

#[derive(Debug, Deserialize)]
struct GenerateResponse {
  #[serde(default)]
  candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
  content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
  #[serde(default)]
  parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
  text: Option<String>,
}

/// Datos curiosos generados con la API de Gemini.
pub struct GeminiFunFacts {
  http: reqwest::Client,
  config: FunFactConfig,
}

impl GeminiFunFacts {
  pub fn new(config: FunFactConfig) -> Result<Self, RemoteError> {
    if config.api_key().is_none() {
      tracing::warn!("Gemini API key not found, fun facts disabled");
    }
    let http = reqwest::Client::builder().timeout(config.timeout()).build()?;
    Ok(Self { http, config })
  }

  pub fn is_enabled(&self) -> bool {
    self.config.api_key().is_some()
  }

  fn endpoint(&self) -> String {
    format!("{}/v1beta/models/{}:generateContent", self.config.base_url.trim_end_matches('/'), self.config.model)
  }
}

pub fn prompt(title: &str, artist: &str) -> String {
  format!(
    "Tell me one, short, interesting fun fact about the song \"{title}\" by the artist \"{artist}\". \
     Keep it to a single, concise sentence. If you don't know, say something cool about the artist."
  )
}

/// Texto del primer candidato (sus partes concatenadas). Vacío si no hay.
pub fn extract_text(body: &str) -> Result<String, FunFactError> {
  let response: GenerateResponse = serde_json::from_str(body).map_err(|e| FunFactError::Provider(e.to_string()))?;

  let text = response
    .candidates
    .into_iter()
    .next()
    .and_then(|c| c.content)
    .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect::<String>())
    .unwrap_or_default();

  Ok(text.trim().to_string())
}

#[async_trait]
impl FunFactProvider for GeminiFunFacts {
  async fn fun_fact(&self, title: &str, artist: &str) -> Result<String, FunFactError> {
    let Some(api_key) = self.config.api_key() else {
      return Err(FunFactError::Disabled);
    };

    let body = json!({
      "contents": [{ "parts": [{ "text": prompt(title, artist) }] }],
      "generationConfig": { "thinkingConfig": { "thinkingBudget": 0 } },
    });

    let response = self
      .http
      .post(self.endpoint())
      .header("x-goog-api-key", api_key)
      .json(&body)
      .send()
      .await
      .map_err(|e| FunFactError::Network(e.to_string()))?;

    let status = response.status();
    let text = response.text().await.map_err(|e| FunFactError::Network(e.to_string()))?;

    if !status.is_success() {
      return Err(FunFactError::Provider(format!("status {status}: {text}")));
    }

    extract_text(&text)
  }
}

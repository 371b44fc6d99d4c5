use rockola_config::{ConfigBackend, ConfigError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Variable de entorno que tiene prioridad sobre `[fun_fact] api_key`.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct MusicBrainzConfig {
  pub base_url: String,
  /// MusicBrainz rechaza peticiones sin `User-Agent` identificable.
  pub user_agent: String,
  pub limit: u32,
  pub timeout_secs: u64,
}

impl Default for MusicBrainzConfig {
  fn default() -> Self {
    Self {
      base_url: "https://musicbrainz.org/ws/2".into(),
      user_agent: concat!("Rockola/", env!("CARGO_PKG_VERSION"), " ( https://example.com/contact )").into(),
      limit: 15,
      timeout_secs: 10,
    }
  }
}

impl MusicBrainzConfig {
  pub fn load_from<B: ConfigBackend>(backend: &B) -> Result<Self, ConfigError> {
    backend.load_or_init("musicbrainz")
  }

  pub fn save_to<B: ConfigBackend>(&self, backend: &B) -> Result<(), ConfigError> {
    backend.save_section("musicbrainz", self)
  }

  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs)
  }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct VenueApiConfig {
  pub api_url: String,
  pub venue_id: String,
  pub timeout_secs: u64,
}

impl Default for VenueApiConfig {
  fn default() -> Self {
    Self { api_url: "http://localhost:3000".into(), venue_id: "cowboy-saloon-main".into(), timeout_secs: 10 }
  }
}

impl VenueApiConfig {
  pub fn load_from<B: ConfigBackend>(backend: &B) -> Result<Self, ConfigError> {
    backend.load_or_init("venue")
  }

  pub fn save_to<B: ConfigBackend>(&self, backend: &B) -> Result<(), ConfigError> {
    backend.save_section("venue", self)
  }

  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs)
  }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct FunFactConfig {
  /// Sin clave la función queda apagada.
  pub api_key: Option<String>,
  pub model: String,
  pub base_url: String,
  pub timeout_secs: u64,
}

impl Default for FunFactConfig {
  fn default() -> Self {
    Self {
      api_key: None,
      model: "gemini-2.5-flash".into(),
      base_url: "https://generativelanguage.googleapis.com".into(),
      timeout_secs: 10,
    }
  }
}

impl FunFactConfig {
  /// Carga `[fun_fact]`. La clave de `GEMINI_API_KEY` se aplica después de
  /// reescribir la sección, así que nunca acaba en el fichero.
  pub fn load_from<B: ConfigBackend>(backend: &B) -> Result<Self, ConfigError> {
    let cfg: Self = backend.load_or_init("fun_fact")?;
    Ok(cfg.with_env_key(std::env::var(GEMINI_API_KEY_ENV).ok()))
  }

  pub fn save_to<B: ConfigBackend>(&self, backend: &B) -> Result<(), ConfigError> {
    backend.save_section("fun_fact", self)
  }

  pub fn with_env_key(mut self, key: Option<String>) -> Self {
    if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
      self.api_key = Some(key);
    }
    self
  }

  pub fn api_key(&self) -> Option<&str> {
    self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
  }

  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs)
  }
}

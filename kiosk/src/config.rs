use rockola_config::{ConfigBackend, ConfigError};
use rockola_core::domain::{CooldownPolicy, RateLimitStatus};
use rockola_core::ranking::FuzzyRankingConfig;
use rockola_core::services::{SearchLimits, format_duration};
use serde::{Deserialize, Serialize};

/// Sección `[rate_limit]`.
pub fn load_cooldown_policy<B: ConfigBackend>(backend: &B) -> Result<CooldownPolicy, ConfigError> {
  backend.load_or_init("rate_limit")
}

/// Sección `[search]`: límites de la búsqueda combinada y umbrales del ranking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
  pub limits: SearchLimits,
  pub ranking: FuzzyRankingConfig,
}

impl SearchConfig {
  pub fn load_from<B: ConfigBackend>(backend: &B) -> Result<Self, ConfigError> {
    backend.load_or_init("search")
  }

  pub fn save_to<B: ConfigBackend>(&self, backend: &B) -> Result<(), ConfigError> {
    backend.save_section("search", self)
  }
}

/// Estado del limitador tal como se muestra (o se vuelca en JSON).
#[derive(Debug, Serialize)]
pub struct StatusDto {
  pub can_request: bool,
  pub is_in_cooldown: bool,
  /// `""` si se puede pedir ya; si no, `"45s"` o `"m:ss"`.
  pub wait: String,
  pub request_count: u32,
  pub remaining_free_requests: u32,
  pub next_cooldown: String,
}

impl From<RateLimitStatus> for StatusDto {
  fn from(status: RateLimitStatus) -> Self {
    StatusDto {
      can_request: status.can_request,
      is_in_cooldown: status.is_in_cooldown,
      wait: format_duration(status.time_until_next_request),
      request_count: status.request_count,
      remaining_free_requests: status.remaining_free_requests,
      next_cooldown: format_duration(status.next_cooldown),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rockola_config::TomlConfigBackend;
  use std::time::Duration;
  use tempfile::tempdir;

  #[test]
  fn rate_limit_tiers_survive_a_round_trip() {
    let tmp = tempdir().unwrap();
    let backend = TomlConfigBackend::at(tmp.path().join("rockola.toml"));

    let first = load_cooldown_policy(&backend).unwrap();
    let written = std::fs::read_to_string(backend.path()).unwrap();
    assert!(written.contains("[[rate_limit.tiers]]"), "got:\n{written}");

    let second = load_cooldown_policy(&backend).unwrap();
    assert_eq!(first, second);
    assert_eq!(second, CooldownPolicy::default());
  }

  #[test]
  fn search_section_is_editable() {
    let tmp = tempdir().unwrap();
    let backend = TomlConfigBackend::at(tmp.path().join("rockola.toml"));

    let mut cfg = SearchConfig::load_from(&backend).unwrap();
    cfg.limits.curated_sufficient = 3;
    cfg.save_to(&backend).unwrap();

    assert_eq!(SearchConfig::load_from(&backend).unwrap().limits.curated_sufficient, 3);
  }

  #[test]
  fn status_dto_formats_durations() {
    let dto = StatusDto::from(RateLimitStatus {
      can_request: false,
      is_in_cooldown: true,
      time_until_next_request: Duration::from_millis(89_001),
      request_count: 5,
      remaining_free_requests: 0,
      next_cooldown: Duration::from_secs(300),
    });
    assert_eq!(dto.wait, "1:30");
    assert_eq!(dto.next_cooldown, "5:00");
  }
}

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Registro persistido de uso de un cliente (un perfil de kiosko).
///
/// Los instantes son milisegundos desde epoch; `0` significa "nunca" / "sin
/// cooldown". Se serializa con las claves `requestCount`, `lastRequestTime` y
/// `cooldownUntil`.
///
/// Invariante: si `cooldown_until != 0` entonces `cooldown_until >= last_request_time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitState {
  pub request_count: u32,
  pub last_request_time: u64,
  pub cooldown_until: u64,
}

impl RateLimitState {
  pub const ZERO: RateLimitState = RateLimitState { request_count: 0, last_request_time: 0, cooldown_until: 0 };

  pub fn is_zero(&self) -> bool {
    *self == Self::ZERO
  }
}

/// Escalón de la tabla de cooldowns: a partir de la petición número
/// `from_request` (tras incrementar) se aplica `cooldown_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CooldownTier {
  pub from_request: u32,
  pub cooldown_ms: u64,
}

/// Política de escalado de cooldowns.
///
/// Por defecto:
///
/// | peticiones | cooldown |
/// |---|---|
/// | 1–3 | ninguno |
/// | 4 | 30 s |
/// | 5 | 60 s |
/// | 6+ | 5 min |
///
/// y el contador se reinicia tras una hora sin peticiones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CooldownPolicy {
  pub free_requests: u32,
  pub inactivity_reset_ms: u64,
  /// Va el último: en TOML se escribe como `[[rate_limit.tiers]]`.
  pub tiers: Vec<CooldownTier>,
}

impl Default for CooldownPolicy {
  fn default() -> Self {
    Self {
      free_requests: 3,
      inactivity_reset_ms: 60 * 60 * 1000,
      tiers: vec![
        CooldownTier { from_request: 4, cooldown_ms: 30_000 },
        CooldownTier { from_request: 5, cooldown_ms: 60_000 },
        CooldownTier { from_request: 6, cooldown_ms: 300_000 },
      ],
    }
  }
}

impl CooldownPolicy {
  /// Cooldown que corresponde a la petición número `request_count` (1-indexado).
  pub fn cooldown_for(&self, request_count: u32) -> Duration {
    if request_count <= self.free_requests {
      return Duration::ZERO;
    }

    let ms = self
      .tiers
      .iter()
      .filter(|tier| tier.from_request <= request_count)
      .max_by_key(|tier| tier.from_request)
      .map(|tier| tier.cooldown_ms)
      .unwrap_or(0);

    Duration::from_millis(ms)
  }

  pub fn inactivity_reset(&self) -> Duration {
    Duration::from_millis(self.inactivity_reset_ms)
  }
}

/// Foto del limitador lista para pintar en la interfaz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateLimitStatus {
  pub can_request: bool,
  pub is_in_cooldown: bool,
  pub time_until_next_request: Duration,
  pub request_count: u32,
  pub remaining_free_requests: u32,
  pub next_cooldown: Duration,
}

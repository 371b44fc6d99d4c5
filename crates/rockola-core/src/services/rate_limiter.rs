use std::time::Duration;

use crate::domain::{CooldownPolicy, RateLimitState, RateLimitStatus};
use crate::ports::KeyValueStore;

/// Clave bajo la que se guarda el registro del limitador.
pub const RATE_LIMIT_KEY: &str = "rockola.request_limits";

/// Limitador de peticiones del lado del cliente.
///
/// Es contabilidad consultiva, no una barrera: el estado se pasa explícitamente
/// en cada operación y el único efecto lateral es leer/escribir el registro en
/// el `KeyValueStore`. Cualquier fallo de almacenamiento degrada al estado a
/// ceros (fail-open) y se registra con `tracing`.
pub struct RateLimiter<S>
where
  S: KeyValueStore,
{
  store: S,
  policy: CooldownPolicy,
  key: String,
}

impl<S> RateLimiter<S>
where
  S: KeyValueStore,
{
  pub fn new(store: S) -> Self {
    Self::with_policy(store, CooldownPolicy::default())
  }

  pub fn with_policy(store: S, policy: CooldownPolicy) -> Self {
    Self { store, policy, key: RATE_LIMIT_KEY.to_string() }
  }

  /// Cambia la clave de almacenamiento (un perfil de kiosko por clave).
  pub fn with_key(mut self, key: impl Into<String>) -> Self {
    self.key = key.into();
    self
  }

  pub fn policy(&self) -> &CooldownPolicy {
    &self.policy
  }

  /// Lee el registro persistido.
  ///
  /// - sin registro → ceros, sin escribir nada;
  /// - más de `inactivity_reset` desde la última petición → ceros, y se persisten;
  /// - error de lectura o JSON corrupto → ceros (el error solo se registra).
  pub fn load(&self, now: u64) -> RateLimitState {
    let raw = match self.store.get(&self.key) {
      Ok(Some(raw)) => raw,
      Ok(None) => return RateLimitState::ZERO,
      Err(e) => {
        tracing::error!(key = %self.key, error = %e, "rate limit store unreadable, failing open");
        return RateLimitState::ZERO;
      }
    };

    let state: RateLimitState = match serde_json::from_str(&raw) {
      Ok(state) => state,
      Err(e) => {
        tracing::error!(key = %self.key, error = %e, "rate limit record is corrupt, failing open");
        return RateLimitState::ZERO;
      }
    };

    let idle_ms = now.saturating_sub(state.last_request_time);
    if state.last_request_time != 0 && idle_ms > self.policy.inactivity_reset_ms {
      tracing::info!(idle_ms, previous_count = state.request_count, "rate limit reset after inactivity");
      self.persist(&RateLimitState::ZERO);
      return RateLimitState::ZERO;
    }

    state
  }

  pub fn can_request(&self, state: &RateLimitState, now: u64) -> bool {
    now >= state.cooldown_until
  }

  pub fn time_until_next_request(&self, state: &RateLimitState, now: u64) -> Duration {
    Duration::from_millis(state.cooldown_until.saturating_sub(now))
  }

  /// Apunta una petición ya aceptada y devuelve el nuevo estado.
  ///
  /// No comprueba `can_request`: eso le toca a quien llama, justo antes.
  pub fn record_request(&self, state: &RateLimitState, now: u64) -> RateLimitState {
    let request_count = state.request_count.saturating_add(1);
    let cooldown = self.policy.cooldown_for(request_count);
    let cooldown_until = if cooldown.is_zero() { 0 } else { now.saturating_add(cooldown.as_millis() as u64) };

    let next = RateLimitState { request_count, last_request_time: now, cooldown_until };
    tracing::debug!(request_count, cooldown_ms = cooldown.as_millis() as u64, "request recorded");

    self.persist(&next);
    next
  }

  /// Pone el contador a cero y lo persiste.
  pub fn reset(&self) -> RateLimitState {
    self.persist(&RateLimitState::ZERO);
    RateLimitState::ZERO
  }

  pub fn remaining_free_requests(&self, state: &RateLimitState) -> u32 {
    self.policy.free_requests.saturating_sub(state.request_count)
  }

  /// Cooldown que provocaría la siguiente petición.
  pub fn next_cooldown_duration(&self, state: &RateLimitState) -> Duration {
    self.policy.cooldown_for(state.request_count.saturating_add(1))
  }

  pub fn status(&self, state: &RateLimitState, now: u64) -> RateLimitStatus {
    let time_until_next_request = self.time_until_next_request(state, now);
    RateLimitStatus {
      can_request: self.can_request(state, now),
      is_in_cooldown: !time_until_next_request.is_zero(),
      time_until_next_request,
      request_count: state.request_count,
      remaining_free_requests: self.remaining_free_requests(state),
      next_cooldown: self.next_cooldown_duration(state),
    }
  }

  fn persist(&self, state: &RateLimitState) {
    let encoded = match serde_json::to_string(state) {
      Ok(encoded) => encoded,
      Err(e) => {
        tracing::error!(error = %e, "failed to encode rate limit record");
        return;
      }
    };

    if let Err(e) = self.store.put(&self.key, &encoded) {
      tracing::error!(key = %self.key, error = %e, "failed to persist rate limit record");
    }
  }
}

/// Formatea un tiempo restante para mostrarlo al cliente.
///
/// Cero → `""`; los segundos se redondean hacia arriba; menos de un minuto →
/// `"45s"`; a partir de ahí `"m:ss"`.
pub fn format_duration(duration: Duration) -> String {
  if duration.is_zero() {
    return String::new();
  }

  let total_seconds = duration.as_millis().div_ceil(1000);
  let minutes = total_seconds / 60;
  let seconds = total_seconds % 60;

  if minutes > 0 { format!("{minutes}:{seconds:02}") } else { format!("{seconds}s") }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ports::StoreError;
  use std::collections::HashMap;
  use std::sync::Mutex;
  use std::sync::atomic::{AtomicUsize, Ordering};

  #[derive(Default)]
  struct FakeStore {
    entries: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
    broken: bool,
  }

  impl FakeStore {
    fn broken() -> Self {
      Self { broken: true, ..Self::default() }
    }

    fn with_state(state: RateLimitState) -> Self {
      let store = Self::default();
      store.entries.lock().unwrap().insert(RATE_LIMIT_KEY.to_string(), serde_json::to_string(&state).unwrap());
      store
    }

    fn stored(&self) -> Option<RateLimitState> {
      let entries = self.entries.lock().unwrap();
      entries.get(RATE_LIMIT_KEY).map(|raw| serde_json::from_str(raw).unwrap())
    }
  }

  impl KeyValueStore for FakeStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
      if self.broken {
        return Err(StoreError::Unavailable("disk on fire".into()));
      }
      Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
      if self.broken {
        return Err(StoreError::Unavailable("disk on fire".into()));
      }
      self.writes.fetch_add(1, Ordering::SeqCst);
      self.entries.lock().unwrap().insert(key.to_string(), value.to_string());
      Ok(())
    }
  }

  const T0: u64 = 1_700_000_000_000;

  #[test]
  fn cooldowns_escalate_monotonically() {
    let limiter = RateLimiter::new(FakeStore::default());
    let mut state = limiter.load(T0);
    let mut cooldowns = Vec::new();

    for i in 0..8u64 {
      let now = T0 + i * 1_000;
      state = limiter.record_request(&state, now);
      cooldowns.push(state.cooldown_until.saturating_sub(now));
    }

    assert_eq!(cooldowns, vec![0, 0, 0, 30_000, 60_000, 300_000, 300_000, 300_000]);
  }

  #[test]
  fn fresh_client_can_request_without_writing() {
    let store = FakeStore::default();
    let limiter = RateLimiter::new(store);
    let state = limiter.load(T0);

    assert!(limiter.can_request(&state, T0));
    assert_eq!(limiter.remaining_free_requests(&state), 3);
    assert_eq!(limiter.store.writes.load(Ordering::SeqCst), 0);
  }

  #[test]
  fn inactivity_resets_and_persists() {
    let t = T0;
    let stored = RateLimitState { request_count: 6, last_request_time: t, cooldown_until: t + 300_000 };
    let limiter = RateLimiter::new(FakeStore::with_state(stored));

    let state = limiter.load(t + 3_600_001);

    assert_eq!(state.request_count, 0);
    assert_eq!(state.cooldown_until, 0);
    assert_eq!(limiter.store.stored(), Some(RateLimitState::ZERO));
  }

  #[test]
  fn exactly_one_hour_is_not_inactivity() {
    let stored = RateLimitState { request_count: 4, last_request_time: T0, cooldown_until: T0 + 30_000 };
    let limiter = RateLimiter::new(FakeStore::with_state(stored));
    assert_eq!(limiter.load(T0 + 3_600_000), stored);
  }

  #[test]
  fn broken_store_fails_open() {
    let limiter = RateLimiter::new(FakeStore::broken());
    let state = limiter.load(T0);
    assert!(state.is_zero());
    assert!(limiter.can_request(&state, T0));

    // Registrar tampoco falla aunque no se pueda persistir.
    let next = limiter.record_request(&state, T0);
    assert_eq!(next.request_count, 1);
  }

  #[test]
  fn corrupt_record_fails_open() {
    let store = FakeStore::default();
    store.entries.lock().unwrap().insert(RATE_LIMIT_KEY.to_string(), "{not json".to_string());
    let limiter = RateLimiter::new(store);
    assert!(limiter.load(T0).is_zero());
  }

  #[test]
  fn cooldown_blocks_until_it_expires() {
    let limiter = RateLimiter::new(FakeStore::default());
    let state = RateLimitState { request_count: 3, last_request_time: T0, cooldown_until: 0 };
    let state = limiter.record_request(&state, T0);

    assert!(!limiter.can_request(&state, T0 + 29_999));
    assert_eq!(limiter.time_until_next_request(&state, T0 + 10_000), Duration::from_millis(20_000));
    assert!(limiter.can_request(&state, T0 + 30_000));
    assert_eq!(limiter.time_until_next_request(&state, T0 + 40_000), Duration::ZERO);
    assert!(state.cooldown_until >= state.last_request_time);
  }

  #[test]
  fn record_persists_the_new_state() {
    let limiter = RateLimiter::new(FakeStore::default());
    let state = limiter.record_request(&RateLimitState::ZERO, T0);
    assert_eq!(limiter.store.stored(), Some(state));
    assert_eq!(limiter.load(T0 + 1), state);
  }

  #[test]
  fn reset_zeroes_and_persists() {
    let stored = RateLimitState { request_count: 5, last_request_time: T0, cooldown_until: T0 + 60_000 };
    let limiter = RateLimiter::new(FakeStore::with_state(stored));
    assert!(limiter.reset().is_zero());
    assert_eq!(limiter.store.stored(), Some(RateLimitState::ZERO));
  }

  #[test]
  fn remaining_and_next_cooldown() {
    let limiter = RateLimiter::new(FakeStore::default());
    let state = RateLimitState { request_count: 3, last_request_time: T0, cooldown_until: 0 };
    assert_eq!(limiter.remaining_free_requests(&state), 0);
    assert_eq!(limiter.next_cooldown_duration(&state), Duration::from_secs(30));
    assert_eq!(limiter.next_cooldown_duration(&RateLimitState::ZERO), Duration::ZERO);
  }

  #[test]
  fn status_reports_cooldown() {
    let limiter = RateLimiter::new(FakeStore::default());
    let state = RateLimitState { request_count: 5, last_request_time: T0, cooldown_until: T0 + 60_000 };
    let status = limiter.status(&state, T0 + 15_000);
    assert!(!status.can_request);
    assert!(status.is_in_cooldown);
    assert_eq!(status.time_until_next_request, Duration::from_secs(45));
    assert_eq!(status.next_cooldown, Duration::from_secs(300));
  }

  #[test]
  fn format_duration_examples() {
    assert_eq!(format_duration(Duration::ZERO), "");
    assert_eq!(format_duration(Duration::from_millis(5_000)), "5s");
    assert_eq!(format_duration(Duration::from_millis(90_000)), "1:30");
    assert_eq!(format_duration(Duration::from_millis(1_200)), "2s");
    assert_eq!(format_duration(Duration::from_millis(300_000)), "5:00");
  }
}

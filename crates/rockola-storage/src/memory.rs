use std::collections::HashMap;
use std::sync::RwLock;

use rockola_core::ports::{KeyValueStore, StoreError};

/// Almacén volátil para `--ephemeral` y tests; se pierde al salir.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
  entries: RwLock<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
  pub fn new() -> Self {
    Self::default()
  }
}

impl KeyValueStore for MemoryKeyValueStore {
  fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
    let entries = self.entries.read().map_err(|_| StoreError::Unavailable("memory store poisoned".into()))?;
    Ok(entries.get(key).cloned())
  }

  fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
    let mut entries = self.entries.write().map_err(|_| StoreError::Unavailable("memory store poisoned".into()))?;
    entries.insert(key.to_string(), value.to_string());
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rockola_core::services::RateLimiter;

  #[test]
  fn rate_limiter_round_trips_through_memory() {
    let limiter = RateLimiter::new(MemoryKeyValueStore::new());
    let now = 1_000_000;
    let state = limiter.load(now);
    limiter.record_request(&state, now);

    assert_eq!(limiter.load(now + 10).request_count, 1);
  }
}

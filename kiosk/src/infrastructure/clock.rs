use std::time::{SystemTime, UNIX_EPOCH};

use rockola_core::ports::Clock;

/// Reloj de pared del sistema.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now_millis(&self) -> u64 {
    // Un reloj anterior a 1970 cuenta como "nunca"; el limitador falla abierto.
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or(0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn system_clock_is_after_2020() {
    assert!(SystemClock.now_millis() > 1_577_836_800_000);
  }
}

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use rockola_core::services::{RateLimiter, format_duration};
use rockola_storage::SqliteKeyValueStore;

fn main() {
  // Misma base que usaría el kiosko si se arranca desde este directorio.
  let path = PathBuf::from("rockola.db");
  let store = SqliteKeyValueStore::open(&path, Some("WAL".to_string())).expect("failed to open database");
  let limiter = RateLimiter::new(store);

  let now = SystemTime::now().duration_since(UNIX_EPOCH).expect("clock before 1970").as_millis() as u64;
  let state = limiter.load(now);
  println!("Loaded from DB: {state:?}");

  if limiter.can_request(&state, now) {
    let next = limiter.record_request(&state, now);
    println!("Recorded request #{}", next.request_count);
  } else {
    println!("Cooling down: {}", format_duration(limiter.time_until_next_request(&state, now)));
  }

  println!("Status: {:?}", limiter.status(&limiter.load(now), now));
}

use std::time::Duration;

use crate::domain::{ManualEntry, RateLimitState, RateLimitStatus, SongRequest};
use crate::ports::{
  Clock, FunFactError, FunFactProvider, KeyValueStore, RequestSubmitter, SubmissionError,
};
use crate::services::rate_limiter::{RateLimiter, format_duration};

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
  #[error("{0}")]
  Validation(String),

  #[error("please wait {} before requesting another song", wait_text(.remaining))]
  CoolingDown { remaining: Duration },

  /// El sistema del local rechazó la petición (lista negra, etc.).
  #[error("{message}")]
  Rejected { message: String },

  #[error("failed to submit request: {0}")]
  Submission(#[from] SubmissionError),
}

fn wait_text(remaining: &Duration) -> String {
  format_duration(*remaining)
}

/// Resultado de una petición aceptada.
#[derive(Debug, Clone)]
pub struct RequestReceipt {
  pub request: SongRequest,
  /// Mensaje opcional que devolvió el sistema del local.
  pub message: Option<String>,
  pub fun_fact: String,
  pub rate_limit: RateLimitState,
}

/// Ciclo de vida de una petición de canción:
/// validar → comprobar el limitador → enviar → apuntar → dato curioso.
pub struct RequestService<S, Q, F, C>
where
  S: KeyValueStore,
  Q: RequestSubmitter,
  F: FunFactProvider,
  C: Clock,
{
  limiter: RateLimiter<S>,
  submitter: Q,
  fun_facts: F,
  clock: C,
  venue: String,
}

impl<S, Q, F, C> RequestService<S, Q, F, C>
where
  S: KeyValueStore,
  Q: RequestSubmitter,
  F: FunFactProvider,
  C: Clock,
{
  pub fn new(limiter: RateLimiter<S>, submitter: Q, fun_facts: F, clock: C, venue: impl Into<String>) -> Self {
    Self { limiter, submitter, fun_facts, clock, venue: venue.into() }
  }

  pub fn limiter(&self) -> &RateLimiter<S> {
    &self.limiter
  }

  pub fn status(&self) -> RateLimitStatus {
    let now = self.clock.now_millis();
    let state = self.limiter.load(now);
    self.limiter.status(&state, now)
  }

  pub fn reset_limits(&self) -> RateLimitState {
    self.limiter.reset()
  }

  /// Petición escrita a mano (`"Título - Artista"`).
  pub async fn submit_manual(&self, entry: &str) -> Result<RequestReceipt, RequestError> {
    let entry = ManualEntry::parse(entry)
      .ok_or_else(|| RequestError::Validation("Please enter a song title to request.".to_string()))?;
    self.submit(&entry.title, &entry.artist).await
  }

  pub async fn submit(&self, title: &str, artist: &str) -> Result<RequestReceipt, RequestError> {
    let title = title.trim();
    let artist = artist.trim();
    if title.is_empty() {
      return Err(RequestError::Validation("Please enter a song title to request.".to_string()));
    }

    let now = self.clock.now_millis();
    let state = self.limiter.load(now);
    if !self.limiter.can_request(&state, now) {
      return Err(RequestError::CoolingDown { remaining: self.limiter.time_until_next_request(&state, now) });
    }

    let request = SongRequest::new(title, artist, &self.venue, now);
    let outcome = self.submitter.submit(&request).await?;

    if !outcome.accepted {
      let message = outcome.message.unwrap_or_else(|| format!("\"{title}\" is not available for request."));
      tracing::info!(song_id = %request.song_id, %message, "request rejected by venue");
      return Err(RequestError::Rejected { message });
    }

    // El envío puede tardar: el cooldown cuenta desde que el local acepta.
    let accepted_at = self.clock.now_millis();
    let rate_limit = self.limiter.record_request(&state, accepted_at);
    tracing::info!(song_id = %request.song_id, count = rate_limit.request_count, "request accepted");

    let fun_fact = self.fun_fact_or_fallback(title, artist).await;

    Ok(RequestReceipt { request, message: outcome.message, fun_fact, rate_limit })
  }

  async fn fun_fact_or_fallback(&self, title: &str, artist: &str) -> String {
    match self.fun_facts.fun_fact(title, artist).await {
      Ok(fact) if !fact.trim().is_empty() => fact.trim().to_string(),
      Ok(_) => format!("Your request for \"{title}\" by {artist} has been sent to the DJ!"),
      Err(FunFactError::Disabled) => {
        "Your request has been submitted! (Fun fact feature is currently offline).".to_string()
      }
      Err(e) => {
        tracing::warn!(error = %e, "fun fact unavailable");
        format!("Could not fetch a fun fact for \"{title}\", but your request is in the queue!")
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::SubmissionOutcome;
  use crate::ports::StoreError;
  use crate::services::rate_limiter::RATE_LIMIT_KEY;
  use async_trait::async_trait;
  use futures::executor::block_on;
  use std::collections::HashMap;
  use std::sync::Mutex;
  use std::sync::atomic::{AtomicU64, Ordering};

  #[derive(Default)]
  struct MemStore(Mutex<HashMap<String, String>>);

  impl KeyValueStore for MemStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
      Ok(self.0.lock().unwrap().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
      self.0.lock().unwrap().insert(key.to_string(), value.to_string());
      Ok(())
    }
  }

  struct FixedClock(AtomicU64);

  impl FixedClock {
    fn at(ms: u64) -> Self {
      Self(AtomicU64::new(ms))
    }

    fn advance(&self, ms: u64) {
      self.0.fetch_add(ms, Ordering::SeqCst);
    }
  }

  impl Clock for FixedClock {
    fn now_millis(&self) -> u64 {
      self.0.load(Ordering::SeqCst)
    }
  }

  #[derive(Default)]
  struct RecordingSubmitter {
    sent: Mutex<Vec<SongRequest>>,
    reject: bool,
  }

  #[async_trait]
  impl RequestSubmitter for RecordingSubmitter {
    async fn submit(&self, request: &SongRequest) -> Result<SubmissionOutcome, SubmissionError> {
      self.sent.lock().unwrap().push(request.clone());
      if self.reject {
        Ok(SubmissionOutcome { accepted: false, message: Some("Song is blacklisted".into()) })
      } else {
        Ok(SubmissionOutcome { accepted: true, message: None })
      }
    }
  }

  struct Facts(Result<&'static str, fn() -> FunFactError>);

  #[async_trait]
  impl FunFactProvider for Facts {
    async fn fun_fact(&self, _title: &str, _artist: &str) -> Result<String, FunFactError> {
      self.0.map(str::to_string).map_err(|make| make())
    }
  }

  const T0: u64 = 1_700_000_000_000;

  fn service(
    submitter: RecordingSubmitter,
    facts: Facts,
  ) -> RequestService<MemStore, RecordingSubmitter, Facts, FixedClock> {
    RequestService::new(RateLimiter::new(MemStore::default()), submitter, facts, FixedClock::at(T0), "main-hall")
  }

  #[test]
  fn accepted_request_is_recorded_and_gets_fun_fact() {
    let svc = service(RecordingSubmitter::default(), Facts(Ok("Written in one afternoon.")));
    let receipt = block_on(svc.submit("Jolene", "Dolly Parton")).unwrap();

    assert_eq!(receipt.fun_fact, "Written in one afternoon.");
    assert_eq!(receipt.rate_limit.request_count, 1);
    assert_eq!(receipt.request.venue, "main-hall");
    assert_eq!(receipt.request.timestamp, T0);
    assert_eq!(svc.status().remaining_free_requests, 2);
  }

  #[test]
  fn fourth_request_starts_cooldown_and_fifth_is_blocked() {
    let svc = service(RecordingSubmitter::default(), Facts(Ok("fact")));
    for _ in 0..4 {
      block_on(svc.submit("Jolene", "Dolly Parton")).unwrap();
      svc.clock.advance(1_000);
    }

    let err = block_on(svc.submit("Jolene", "Dolly Parton")).unwrap_err();
    match err {
      RequestError::CoolingDown { remaining } => assert_eq!(remaining, Duration::from_millis(29_000)),
      other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(svc.submitter.sent.lock().unwrap().len(), 4);

    svc.clock.advance(29_000);
    assert!(block_on(svc.submit("Jolene", "Dolly Parton")).is_ok());
  }

  struct SlowSubmitter<'a> {
    clock: &'a AtomicU64,
    latency_ms: u64,
  }

  #[async_trait]
  impl RequestSubmitter for SlowSubmitter<'_> {
    async fn submit(&self, _request: &SongRequest) -> Result<SubmissionOutcome, SubmissionError> {
      self.clock.fetch_add(self.latency_ms, Ordering::SeqCst);
      Ok(SubmissionOutcome { accepted: true, message: None })
    }
  }

  struct SharedClock<'a>(&'a AtomicU64);

  impl Clock for SharedClock<'_> {
    fn now_millis(&self) -> u64 {
      self.0.load(Ordering::SeqCst)
    }
  }

  #[test]
  fn cooldown_counts_from_acceptance_not_from_sending() {
    let now = AtomicU64::new(T0);
    let store = MemStore::default();
    let three = RateLimitState { request_count: 3, last_request_time: T0, cooldown_until: 0 };
    store.put(RATE_LIMIT_KEY, &serde_json::to_string(&three).unwrap()).unwrap();

    let svc = RequestService::new(
      RateLimiter::new(store),
      SlowSubmitter { clock: &now, latency_ms: 2_000 },
      Facts(Ok("fact")),
      SharedClock(&now),
      "main-hall",
    );
    let receipt = block_on(svc.submit("Jolene", "Dolly Parton")).unwrap();

    assert_eq!(receipt.request.timestamp, T0);
    assert_eq!(receipt.rate_limit.request_count, 4);
    assert_eq!(receipt.rate_limit.last_request_time, T0 + 2_000);
    assert_eq!(receipt.rate_limit.cooldown_until, T0 + 2_000 + 30_000);
  }

  #[test]
  fn rejection_does_not_count_against_the_limit() {
    let svc = service(RecordingSubmitter { reject: true, ..Default::default() }, Facts(Ok("fact")));
    let err = block_on(svc.submit("Jolene", "Dolly Parton")).unwrap_err();
    assert!(matches!(err, RequestError::Rejected { ref message } if message == "Song is blacklisted"));
    assert_eq!(svc.status().request_count, 0);
  }

  #[test]
  fn empty_title_is_a_validation_error() {
    let svc = service(RecordingSubmitter::default(), Facts(Ok("fact")));
    assert!(matches!(block_on(svc.submit("  ", "Someone")), Err(RequestError::Validation(_))));
    assert!(matches!(block_on(svc.submit_manual("   ")), Err(RequestError::Validation(_))));
    assert!(svc.submitter.sent.lock().unwrap().is_empty());
  }

  #[test]
  fn manual_entry_is_parsed_before_submitting() {
    let svc = service(RecordingSubmitter::default(), Facts(Ok("fact")));
    block_on(svc.submit_manual("Neon Moon - Brooks & Dunn")).unwrap();
    let sent = svc.submitter.sent.lock().unwrap();
    assert_eq!(sent[0].title, "Neon Moon");
    assert_eq!(sent[0].artist, "Brooks & Dunn");
  }

  #[test]
  fn fun_fact_failures_fall_back() {
    let offline = service(RecordingSubmitter::default(), Facts(Err(|| FunFactError::Disabled)));
    let receipt = block_on(offline.submit("Jolene", "Dolly Parton")).unwrap();
    assert!(receipt.fun_fact.contains("currently offline"));

    let broken = service(RecordingSubmitter::default(), Facts(Err(|| FunFactError::Network("timeout".into()))));
    let receipt = block_on(broken.submit("Jolene", "Dolly Parton")).unwrap();
    assert_eq!(receipt.fun_fact, "Could not fetch a fun fact for \"Jolene\", but your request is in the queue!");

    let empty = service(RecordingSubmitter::default(), Facts(Ok("  ")));
    let receipt = block_on(empty.submit("Jolene", "Dolly Parton")).unwrap();
    assert_eq!(receipt.fun_fact, "Your request for \"Jolene\" by Dolly Parton has been sent to the DJ!");
  }

  #[test]
  fn reset_limits_clears_cooldown() {
    let svc = service(RecordingSubmitter::default(), Facts(Ok("fact")));
    for _ in 0..5 {
      let _ = block_on(svc.submit("Jolene", "Dolly Parton"));
    }
    assert!(!svc.status().can_request);
    svc.reset_limits();
    assert!(svc.status().can_request);
  }
}

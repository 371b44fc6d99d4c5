use async_trait::async_trait;

use crate::domain::{SongRequest, SubmissionOutcome};

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
  #[error("network error: {0}")]
  Network(String),

  #[error("request failed: {status} - {message}")]
  Status { status: u16, message: String },

  #[error("malformed response: {0}")]
  Malformed(String),
}

/// Port hacia el sistema del local que recibe las peticiones (webhook / API REST).
///
/// Puede rechazar una petición por su cuenta (lista negra, cola llena...); eso
/// llega como `SubmissionOutcome { accepted: false, .. }` y es independiente
/// del limitador local.
#[async_trait]
pub trait RequestSubmitter: Send + Sync {
  async fn submit(&self, request: &SongRequest) -> Result<SubmissionOutcome, SubmissionError>;
}

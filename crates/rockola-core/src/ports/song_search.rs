use async_trait::async_trait;

use crate::domain::{ExternalSong, SearchMode};

#[derive(Debug, thiserror::Error)]
pub enum SearchProviderError {
  #[error("network error: {0}")]
  Network(String),

  #[error("unexpected status {status}: {message}")]
  Status { status: u16, message: String },

  #[error("malformed response: {0}")]
  Malformed(String),
}

/// Port del buscador externo de canciones (MusicBrainz u otro).
///
/// Devuelve la lista ya ordenada por su propia relevancia; el núcleo no la
/// reordena. Puede tardar lo que quiera y puede fallar.
#[async_trait]
pub trait SongSearchProvider: Send + Sync {
  async fn search(&self, query: &str, mode: SearchMode) -> Result<Vec<ExternalSong>, SearchProviderError>;
}

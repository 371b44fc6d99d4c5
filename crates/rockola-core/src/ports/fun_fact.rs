use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum FunFactError {
  /// No hay credenciales configuradas: la función está apagada.
  #[error("fun fact provider disabled")]
  Disabled,

  #[error("network error: {0}")]
  Network(String),

  #[error("provider error: {0}")]
  Provider(String),
}

/// Port decorativo: un dato curioso sobre la canción pedida.
///
/// Nunca bloquea el flujo de petición; quien lo usa debe tragarse el error.
#[async_trait]
pub trait FunFactProvider: Send + Sync {
  async fn fun_fact(&self, title: &str, artist: &str) -> Result<String, FunFactError>;
}

use thiserror::Error;

/// Error de arranque del kiosko.
///
/// Los servicios de búsqueda y de límite no fallan nunca (degradan a un valor
/// seguro). Este tipo lo usan las capas superiores para agrupar los errores de
/// los adapters mientras se cablea la aplicación.
#[derive(Debug, Error)]
pub enum CoreError {
  #[error("storage error: {0}")]
  Storage(String),

  #[error("catalog error: {0}")]
  Catalog(String),

  #[error("config error: {0}")]
  Config(String),

  #[error("remote service error: {0}")]
  Remote(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  #[error("storage unavailable: {0}")]
  Unavailable(String),

  #[error("storage error: {0}")]
  Storage(String),
}

/// Port de almacenamiento clave-valor para registros pequeños (JSON).
///
/// Cada llamada es atómica: o se escribe el registro entero o no se escribe.
/// Una clave ausente (`Ok(None)`) es un estado distinto de un registro a ceros.
pub trait KeyValueStore: Send + Sync {
  fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
  fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
  fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
    (**self).get(key)
  }

  fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
    (**self).put(key, value)
  }
}

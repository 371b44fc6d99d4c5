/// Fuente de tiempo en milisegundos desde epoch.
pub trait Clock: Send + Sync {
  fn now_millis(&self) -> u64;
}

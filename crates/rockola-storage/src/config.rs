use rockola_config::{ConfigBackend, ConfigError, RockolaPaths};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const SECTION: &str = "storage";

/// Modos de `PRAGMA journal_mode` que aceptamos desde el fichero.
const JOURNAL_MODES: [&str; 6] = ["DELETE", "TRUNCATE", "PERSIST", "MEMORY", "WAL", "OFF"];

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
  /// Sin valor se usa `data/rockola.db` dentro de los directorios del kiosko.
  pub db_path: Option<PathBuf>,
  pub journal_mode: Option<String>,
}

impl Default for StorageConfig {
  fn default() -> Self {
    StorageConfig { db_path: None, journal_mode: Some("WAL".to_string()) }
  }
}

impl StorageConfig {
  pub fn load_from<B: ConfigBackend>(backend: &B) -> Result<Self, ConfigError> {
    backend.load_or_init(SECTION)
  }

  pub fn save_to<B: ConfigBackend>(&self, backend: &B) -> Result<(), ConfigError> {
    backend.save_section(SECTION, self)
  }

  pub fn resolve_db_path(&self, paths: &RockolaPaths) -> PathBuf {
    self.db_path.clone().unwrap_or_else(|| paths.database_file())
  }

  /// Modo de journal normalizado a mayúsculas, o `None` si no es uno conocido.
  pub fn journal_mode(&self) -> Option<String> {
    let mode = self.journal_mode.as_deref()?.trim().to_ascii_uppercase();
    JOURNAL_MODES.contains(&mode.as_str()).then_some(mode)
  }
}

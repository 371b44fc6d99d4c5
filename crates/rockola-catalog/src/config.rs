use rockola_config::{ConfigBackend, ConfigError};
use rockola_core::domain::CuratedCatalog;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::loader::{self, CatalogError};

const SECTION: &str = "catalog";

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct CatalogConfig {
  /// Catálogo propio del local. Sin valor se usa el que trae el binario.
  pub path: Option<PathBuf>,
}

impl CatalogConfig {
  pub fn load_from<B: ConfigBackend>(backend: &B) -> Result<Self, ConfigError> {
    backend.load_or_init(SECTION)
  }

  pub fn save_to<B: ConfigBackend>(&self, backend: &B) -> Result<(), ConfigError> {
    backend.save_section(SECTION, self)
  }

  pub fn load_catalog(&self) -> Result<CuratedCatalog, CatalogError> {
    match &self.path {
      Some(path) => loader::load_from_path(path),
      None => loader::embedded(),
    }
  }
}

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

// toml_edit solo para escribir: conserva comentarios y orden del fichero.
use toml_edit::{DocumentMut, Item};

use crate::io::atomic_write_str;
use crate::paths::{ConfigError, RockolaPaths};

/// Acceso por secciones (`[storage]`, `[musicbrainz]`, ...) a la configuración.
///
/// Cada crate es dueño del tipo de su sección y decide sus valores por defecto.
pub trait ConfigBackend {
  /// `Ok(None)` si no existe el fichero o la sección.
  fn load_section<T: DeserializeOwned>(&self, section: &str) -> Result<Option<T>, ConfigError>;

  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError>;

  /// Carga la sección (o su `Default`) y la vuelve a escribir, de modo que el
  /// fichero siempre muestre todas las claves disponibles.
  fn load_or_init<T>(&self, section: &str) -> Result<T, ConfigError>
  where
    T: DeserializeOwned + Serialize + Default,
  {
    let value = self.load_section(section)?.unwrap_or_default();
    self.save_section(section, &value)?;
    Ok(value)
  }
}

/// Backend sobre `rockola.toml`.
#[derive(Debug, Clone)]
pub struct TomlConfigBackend {
  path: PathBuf,
}

impl TomlConfigBackend {
  pub fn new(paths: &RockolaPaths) -> Self {
    Self { path: paths.config_file() }
  }

  /// Backend sobre un fichero concreto (tests, `--config`).
  pub fn at(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &std::path::Path {
    &self.path
  }

  fn read(&self) -> Result<Option<String>, ConfigError> {
    match fs::read_to_string(&self.path) {
      Ok(content) => Ok(Some(content)),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
      Err(e) => Err(e.into()),
    }
  }
}

impl ConfigBackend for TomlConfigBackend {
  fn load_section<T: DeserializeOwned>(&self, section: &str) -> Result<Option<T>, ConfigError> {
    let Some(content) = self.read()? else {
      tracing::debug!(path = %self.path.display(), "config file not found, using defaults");
      return Ok(None);
    };

    let table: toml::Table = toml::from_str(&content)?;
    let Some(raw) = table.get(section) else {
      return Ok(None);
    };

    let value = raw.clone().try_into().map_err(|e| ConfigError::section(section, format!("decode: {e}")))?;
    Ok(Some(value))
  }

  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError> {
    let mut doc = match self.read()? {
      Some(content) => {
        content.parse::<DocumentMut>().map_err(|e| ConfigError::section(section, format!("parse document: {e}")))?
      }
      None => DocumentMut::new(),
    };

    // La sección se serializa sola (sin cabecera) y se injerta como tabla.
    let encoded = toml::to_string(value).map_err(|e| ConfigError::section(section, format!("encode: {e}")))?;
    let item: Item = encoded
      .parse::<DocumentMut>()
      .map_err(|e| ConfigError::section(section, format!("reparse: {e}")))?
      .into_item();

    doc[section] = item;

    atomic_write_str(&self.path, &doc.to_string())?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde::Deserialize;
  use tempfile::tempdir;

  #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
  #[serde(default)]
  struct VenueSection {
    venue_id: String,
    timeout_secs: u64,
    api_url: Option<String>,
  }

  impl Default for VenueSection {
    fn default() -> Self {
      Self { venue_id: "main-hall".into(), timeout_secs: 10, api_url: None }
    }
  }

  #[test]
  fn missing_file_yields_none() {
    let tmp = tempdir().unwrap();
    let backend = TomlConfigBackend::at(tmp.path().join("rockola.toml"));
    assert_eq!(backend.load_section::<VenueSection>("venue").unwrap(), None);
  }

  #[test]
  fn load_or_init_writes_defaults() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("rockola.toml");
    let backend = TomlConfigBackend::at(&path);

    let loaded: VenueSection = backend.load_or_init("venue").unwrap();
    assert_eq!(loaded, VenueSection::default());

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("[venue]"));
    assert!(written.contains("venue_id = \"main-hall\""));
  }

  #[test]
  fn save_preserves_comments_and_other_sections() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("rockola.toml");
    fs::write(&path, "# kiosk of the saloon\n[storage]\n# keep WAL\njournal_mode = \"WAL\"\n").unwrap();

    let backend = TomlConfigBackend::at(&path);
    let section = VenueSection { venue_id: "patio".into(), timeout_secs: 5, api_url: Some("http://x".into()) };
    backend.save_section("venue", &section).unwrap();

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("# kiosk of the saloon"));
    assert!(written.contains("# keep WAL"));
    assert_eq!(backend.load_section::<VenueSection>("venue").unwrap(), Some(section));
  }

  #[test]
  fn partial_section_uses_field_defaults() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("rockola.toml");
    fs::write(&path, "[venue]\nvenue_id = \"rooftop\"\n").unwrap();

    let loaded: VenueSection = TomlConfigBackend::at(&path).load_section("venue").unwrap().unwrap();
    assert_eq!(loaded.venue_id, "rooftop");
    assert_eq!(loaded.timeout_secs, 10);
  }

  #[test]
  fn wrong_type_is_reported_with_section_name() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("rockola.toml");
    fs::write(&path, "[venue]\ntimeout_secs = \"soon\"\n").unwrap();

    let err = TomlConfigBackend::at(&path).load_section::<VenueSection>("venue").unwrap_err();
    assert!(err.to_string().starts_with("section [venue]"), "got {err}");
  }
}

use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Variable de entorno para instalaciones portables (kiosko en un USB, tests...).
pub const BASE_DIR_ENV: &str = "ROCKOLA_BASE_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
  #[error("toml error: {0}")]
  Toml(#[from] toml::de::Error),
  #[error("directories error: could not determine home directory")]
  Directories,
  #[error("section [{section}]: {message}")]
  Section { section: String, message: String },
}

impl ConfigError {
  pub(crate) fn section(section: &str, message: impl ToString) -> Self {
    ConfigError::Section { section: section.to_string(), message: message.to_string() }
  }
}

/// Directorios donde vive el kiosko: configuración, datos (SQLite) y caché.
#[derive(Debug, Clone)]
pub struct RockolaPaths {
  pub base_dir: PathBuf,
  pub config_dir: PathBuf,
  pub data_dir: PathBuf,
  pub cache_dir: PathBuf,
}

impl RockolaPaths {
  /// `$ROCKOLA_BASE_DIR/{config,data,cache}` si está definida; si no, los
  /// directorios estándar de la plataforma.
  pub fn detect() -> Result<Self, ConfigError> {
    let paths = match std::env::var(BASE_DIR_ENV) {
      Ok(base) => Self::under(Path::new(&base)),
      Err(_) => {
        let dirs = ProjectDirs::from("com", "rockola", "rockola").ok_or(ConfigError::Directories)?;
        Self {
          base_dir: dirs.config_dir().to_path_buf(),
          config_dir: dirs.config_dir().to_path_buf(),
          data_dir: dirs.data_dir().to_path_buf(),
          cache_dir: dirs.cache_dir().to_path_buf(),
        }
      }
    };

    paths.ensure_dirs()?;
    Ok(paths)
  }

  /// Layout portable bajo `base`. No toca el disco.
  pub fn under(base: &Path) -> Self {
    Self {
      base_dir: base.to_path_buf(),
      config_dir: base.join("config"),
      data_dir: base.join("data"),
      cache_dir: base.join("cache"),
    }
  }

  pub fn ensure_dirs(&self) -> Result<(), ConfigError> {
    std::fs::create_dir_all(&self.config_dir)?;
    std::fs::create_dir_all(&self.data_dir)?;
    std::fs::create_dir_all(&self.cache_dir)?;
    Ok(())
  }

  pub fn config_file(&self) -> PathBuf {
    self.config_dir.join("rockola.toml")
  }

  pub fn database_file(&self) -> PathBuf {
    self.data_dir.join("rockola.db")
  }
}

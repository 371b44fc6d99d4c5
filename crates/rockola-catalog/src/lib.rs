//! Catálogo curado del local: fichero TOML embebido o propio, validado al cargar.

pub mod config;
mod loader;

pub use config::CatalogConfig;
pub use loader::{CatalogError, embedded, load_from_path, parse};

mod config;
mod infrastructure;

use std::sync::Arc;

use rockola_catalog::CatalogConfig;
use rockola_config::{RockolaPaths, TomlConfigBackend};
use rockola_core::CoreError;
use rockola_core::ports::KeyValueStore;
use rockola_core::ranking::FuzzyCuratedRanker;
use rockola_core::services::{RateLimiter, RequestService, SearchRanker};
use rockola_remote::{
  FunFactConfig, GeminiFunFacts, MusicBrainzClient, MusicBrainzConfig, VenueApiClient, VenueApiConfig,
};
use rockola_storage::{MemoryKeyValueStore, SqliteKeyValueStore, StorageConfig};

pub use crate::config::{SearchConfig, StatusDto, load_cooldown_policy};
pub use infrastructure::clock::SystemClock;

/// Almacén del limitador; SQLite o memoria según `--ephemeral`.
pub type KioskStore = Arc<dyn KeyValueStore>;

pub type KioskSearch = SearchRanker<MusicBrainzClient, FuzzyCuratedRanker>;

pub type KioskRequests = RequestService<KioskStore, VenueApiClient, GeminiFunFacts, SystemClock>;

#[derive(Debug, Clone, Copy, Default)]
pub struct KioskOptions {
  /// Límites solo en memoria: se olvidan al salir.
  pub ephemeral: bool,
}

/// Servicios del kiosko ya cableados.
pub struct Kiosk {
  pub search: KioskSearch,
  pub requests: KioskRequests,
}

impl Kiosk {
  pub fn bootstrap(paths: &RockolaPaths, options: KioskOptions) -> Result<Self, CoreError> {
    // --- Dependency Injection Phase ---

    // 0. Configuration
    // Every section is read (or created with defaults) from rockola.toml.
    paths.ensure_dirs().map_err(config_error)?;
    let backend = TomlConfigBackend::new(paths);
    let storage_cfg = StorageConfig::load_from(&backend).map_err(config_error)?;
    let catalog_cfg = CatalogConfig::load_from(&backend).map_err(config_error)?;
    let musicbrainz_cfg = MusicBrainzConfig::load_from(&backend).map_err(config_error)?;
    let venue_cfg = VenueApiConfig::load_from(&backend).map_err(config_error)?;
    let fun_fact_cfg = FunFactConfig::load_from(&backend).map_err(config_error)?;
    let policy = load_cooldown_policy(&backend).map_err(config_error)?;
    let search_cfg = SearchConfig::load_from(&backend).map_err(config_error)?;

    // 1. Persistence Adapter (SQLite or memory)
    let store: KioskStore = if options.ephemeral {
      tracing::info!("ephemeral mode, rate limits are kept in memory");
      Arc::new(MemoryKeyValueStore::new())
    } else {
      let db_path = storage_cfg.resolve_db_path(paths);
      tracing::info!(path = %db_path.display(), "opening rate limit store");
      let sqlite =
        SqliteKeyValueStore::from_config(&storage_cfg, &db_path).map_err(|e| CoreError::Storage(e.to_string()))?;
      Arc::new(sqlite)
    };

    // 2. Curated catalog
    let catalog = catalog_cfg.load_catalog().map_err(|e| CoreError::Catalog(e.to_string()))?;
    tracing::info!(songs = catalog.len(), "curated catalog ready");

    // 3. Remote adapters (MusicBrainz, venue API, fun facts)
    let musicbrainz = MusicBrainzClient::new(musicbrainz_cfg).map_err(remote_error)?;
    let venue_id = venue_cfg.venue_id.clone();
    let venue = VenueApiClient::new(venue_cfg).map_err(remote_error)?;
    let fun_facts = GeminiFunFacts::new(fun_fact_cfg).map_err(remote_error)?;

    // 4. Service wiring
    let search = SearchRanker::with_ranker(catalog, FuzzyCuratedRanker::new(search_cfg.ranking), musicbrainz)
      .with_limits(search_cfg.limits);
    let limiter = RateLimiter::with_policy(store, policy);
    let requests = RequestService::new(limiter, venue, fun_facts, SystemClock, venue_id);

    Ok(Kiosk { search, requests })
  }
}

fn config_error(e: rockola_config::ConfigError) -> CoreError {
  CoreError::Config(e.to_string())
}

fn remote_error(e: rockola_remote::RemoteError) -> CoreError {
  CoreError::Remote(e.to_string())
}

pub mod config;
mod memory;
pub mod models;
pub mod schema;

use std::path::Path;
use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use rockola_core::ports::{KeyValueStore, StoreError};

pub use crate::config::StorageConfig;
pub use crate::memory::MemoryKeyValueStore;
use crate::models::NewKvEntry;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
  #[error("connection pool error: {0}")]
  Pool(#[from] r2d2::PoolError),

  #[error("migration error: {0}")]
  Migration(String),

  #[error("database error: {0}")]
  Query(#[from] diesel::result::Error),
}

/// PRAGMAs por conexión: el journal configurado y espera ante bloqueos, que
/// varios kioskos pueden compartir el mismo fichero.
#[derive(Debug, Clone)]
struct ConnectionOptions {
  journal_mode: Option<String>,
  busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionOptions {
  fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
    let mut pragmas = format!("PRAGMA busy_timeout = {};", self.busy_timeout.as_millis());
    if let Some(mode) = &self.journal_mode {
      pragmas.push_str(&format!(" PRAGMA journal_mode = {mode};"));
    }
    conn.batch_execute(&pragmas).map_err(r2d2::Error::QueryError)
  }
}

/// Registros clave-valor en la tabla `kv_store`, un registro JSON por clave.
pub struct SqliteKeyValueStore {
  pool: SqlitePool,
}

impl SqliteKeyValueStore {
  pub fn open(path: &Path, journal_mode: Option<String>) -> Result<Self, StorageError> {
    let manager = ConnectionManager::<SqliteConnection>::new(path.to_string_lossy());
    let options = ConnectionOptions { journal_mode, busy_timeout: Duration::from_secs(5) };

    let pool = Pool::builder().max_size(4).connection_customizer(Box::new(options)).build(manager)?;

    let mut pooled = pool.get()?;
    let conn: &mut SqliteConnection = &mut pooled;
    let applied = conn.run_pending_migrations(MIGRATIONS).map_err(|e| StorageError::Migration(e.to_string()))?;
    if !applied.is_empty() {
      tracing::info!(path = %path.display(), migrations = applied.len(), "database migrated");
    }

    Ok(Self { pool })
  }

  pub fn from_config(cfg: &StorageConfig, db_path: &Path) -> Result<Self, StorageError> {
    if cfg.journal_mode.is_some() && cfg.journal_mode().is_none() {
      tracing::warn!(journal_mode = ?cfg.journal_mode, "unknown journal mode, using the SQLite default");
    }
    Self::open(db_path, cfg.journal_mode())
  }

  fn conn(&self) -> Result<PooledConnection<ConnectionManager<SqliteConnection>>, StoreError> {
    self.pool.get().map_err(|e| StoreError::Unavailable(e.to_string()))
  }
}

impl KeyValueStore for SqliteKeyValueStore {
  fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
    use crate::schema::kv_store::dsl::*;

    let mut conn = self.conn()?;
    kv_store
      .filter(namespace.eq(key))
      .select(payload)
      .first::<String>(&mut *conn)
      .optional()
      .map_err(|e| StoreError::Storage(e.to_string()))
  }

  fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
    use crate::schema::kv_store::dsl::*;
    use diesel::dsl::sql;
    use diesel::sql_types::Text;

    let mut conn = self.conn()?;
    let entry = NewKvEntry { namespace: key, payload: value };

    diesel::insert_into(kv_store)
      .values(&entry)
      .on_conflict(namespace)
      .do_update()
      .set((payload.eq(value), updated_at.eq(sql::<Text>("CURRENT_TIMESTAMP"))))
      .execute(&mut *conn)
      .map_err(|e| StoreError::Storage(e.to_string()))?;

    Ok(())
  }
}

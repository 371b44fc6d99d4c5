//! Núcleo del kiosko de peticiones: dominio, ports y servicios.
//!
//! - [`services::RateLimiter`]: cooldowns escalonados persistidos en un `KeyValueStore`.
//! - [`services::SearchRanker`]: catálogo curado + buscador externo, deduplicado.
//! - [`services::RequestService`]: el ciclo completo de una petición.

pub mod domain;
pub mod errors;
pub mod ports;
pub mod ranking;
pub mod services;

pub use errors::CoreError;

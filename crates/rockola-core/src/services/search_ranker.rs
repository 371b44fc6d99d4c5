use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::{CuratedCatalog, ExternalSong, SearchCandidate, SearchMode};
use crate::ports::SongSearchProvider;
use crate::ranking::{CuratedRanker, FuzzyCuratedRanker};

/// Límites de la búsqueda combinada.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchLimits {
  /// Caracteres no blancos mínimos para lanzar una búsqueda.
  pub min_query_chars: usize,
  /// Con al menos tantos resultados curados no se consulta el buscador externo.
  pub curated_sufficient: usize,
  pub max_results: usize,
}

impl Default for SearchLimits {
  fn default() -> Self {
    Self { min_query_chars: 3, curated_sufficient: 5, max_results: 15 }
  }
}

/// Aviso no bloqueante que acompaña a un resultado de búsqueda.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SearchNotice {
  QueryTooShort { min_chars: usize },
  /// El buscador externo falló y el catálogo curado tampoco encontró nada.
  ProviderUnavailable,
}

impl fmt::Display for SearchNotice {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SearchNotice::QueryTooShort { min_chars } => write!(f, "Type at least {min_chars} characters to search."),
      SearchNotice::ProviderUnavailable => write!(f, "Could not fetch song results. Please try again."),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SearchOutcome {
  pub candidates: Vec<SearchCandidate>,
  pub notice: Option<SearchNotice>,
}

impl SearchOutcome {
  fn found(candidates: Vec<SearchCandidate>) -> Self {
    Self { candidates, notice: None }
  }

  pub fn into_candidates(self) -> Vec<SearchCandidate> {
    self.candidates
  }
}

/// Búsqueda combinada: catálogo curado primero, buscador externo después.
///
/// No guarda estado mutable; se puede llamar en paralelo y tantas veces como
/// se quiera. Descartar respuestas obsoletas (la última consulta gana) es cosa
/// de quien llama.
pub struct SearchRanker<P, R = FuzzyCuratedRanker>
where
  P: SongSearchProvider,
  R: CuratedRanker,
{
  catalog: CuratedCatalog,
  ranker: R,
  provider: P,
  limits: SearchLimits,
}

impl<P> SearchRanker<P, FuzzyCuratedRanker>
where
  P: SongSearchProvider,
{
  pub fn new(catalog: CuratedCatalog, provider: P) -> Self {
    Self::with_ranker(catalog, FuzzyCuratedRanker::default(), provider)
  }
}

impl<P, R> SearchRanker<P, R>
where
  P: SongSearchProvider,
  R: CuratedRanker,
{
  pub fn with_ranker(catalog: CuratedCatalog, ranker: R, provider: P) -> Self {
    Self { catalog, ranker, provider, limits: SearchLimits::default() }
  }

  pub fn with_limits(mut self, limits: SearchLimits) -> Self {
    self.limits = limits;
    self
  }

  pub fn catalog(&self) -> &CuratedCatalog {
    &self.catalog
  }

  /// Solo el catálogo curado, sin red.
  pub fn search_curated(&self, query: &str, mode: SearchMode) -> Vec<SearchCandidate> {
    self.ranker.rank(&self.catalog, query, mode)
  }

  pub async fn search(&self, query: &str, mode: SearchMode) -> SearchOutcome {
    let query = query.trim();

    if query.chars().filter(|c| !c.is_whitespace()).count() < self.limits.min_query_chars {
      return SearchOutcome {
        candidates: Vec::new(),
        notice: Some(SearchNotice::QueryTooShort { min_chars: self.limits.min_query_chars }),
      };
    }

    let curated = self.search_curated(query, mode);
    if curated.len() >= self.limits.curated_sufficient {
      tracing::debug!(query, %mode, curated = curated.len(), "curated catalog sufficient, skipping provider");
      return SearchOutcome::found(curated);
    }

    match self.provider.search(query, mode).await {
      Ok(external) => {
        tracing::debug!(query, %mode, curated = curated.len(), external = external.len(), "merging provider results");
        SearchOutcome::found(merge_results(curated, external, self.limits.max_results))
      }
      Err(e) => {
        tracing::warn!(query, %mode, error = %e, "song search provider failed, using curated results only");
        let notice = curated.is_empty().then_some(SearchNotice::ProviderUnavailable);
        SearchOutcome { candidates: curated, notice }
      }
    }
  }
}

/// Curados en su orden y a continuación los externos en el suyo, hasta
/// `max_results` entradas.
///
/// Se salta un externo si repite título y artista (sin distinguir mayúsculas)
/// de un curado, o si su id ya está en la lista. Externos distintos con el
/// mismo título y artista se conservan todos.
pub fn merge_results(
  curated: Vec<SearchCandidate>,
  external: Vec<ExternalSong>,
  max_results: usize,
) -> Vec<SearchCandidate> {
  let mut combined = curated;
  combined.truncate(max_results);
  let curated_len = combined.len();

  for song in external {
    if combined.len() >= max_results {
      break;
    }

    let duplicate = combined[..curated_len].iter().any(|c| c.same_song(&song.title, &song.artist))
      || combined.iter().any(|c| c.id == song.id);
    if !duplicate {
      combined.push(SearchCandidate::from(song));
    }
  }

  combined
}

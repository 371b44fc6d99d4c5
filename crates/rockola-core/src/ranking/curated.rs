use serde::{Deserialize, Serialize};

use crate::domain::{CuratedCatalog, CuratedSong, SearchCandidate, SearchMode};
use crate::ranking::similarity::similarity;

/// Estrategia de ranking del catálogo curado.
///
/// La mezcla con el buscador externo solo depende de esta interfaz, así que se
/// puede cambiar la heurística sin tocar la deduplicación ni el truncado.
pub trait CuratedRanker: Send + Sync {
  /// Candidatos curados para `query`, de más a menos relevante.
  fn rank(&self, catalog: &CuratedCatalog, query: &str, mode: SearchMode) -> Vec<SearchCandidate>;
}

/// Umbrales de la heurística difusa.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuzzyRankingConfig {
  /// Puntuación base mínima (exclusiva) para considerar que hay coincidencia.
  pub relevance_floor: f64,
  /// Suelo que se garantiza cuando el campo contiene la consulta literalmente.
  pub containment_floor: f64,
  pub max_results: usize,
}

impl Default for FuzzyRankingConfig {
  fn default() -> Self {
    Self { relevance_floor: 0.4, containment_floor: 0.8, max_results: 10 }
  }
}

#[derive(Debug, Clone, Copy)]
pub struct ScoredSong<'a> {
  pub song: &'a CuratedSong,
  /// Puntuación base + `popularity / 100`.
  pub score: f64,
}

/// Similitud de Levenshtein + suelo por subcadena + prior de popularidad.
#[derive(Debug, Clone, Default)]
pub struct FuzzyCuratedRanker {
  config: FuzzyRankingConfig,
}

fn normalize_query(query: &str) -> String {
  query.trim().to_lowercase()
}

impl FuzzyCuratedRanker {
  pub fn new(config: FuzzyRankingConfig) -> Self {
    Self { config }
  }

  pub fn config(&self) -> &FuzzyRankingConfig {
    &self.config
  }

  /// Puntuación base de `song` frente a una consulta ya normalizada.
  pub fn base_score(&self, song: &CuratedSong, normalized_query: &str, mode: SearchMode) -> f64 {
    let (mut best, field) = match mode {
      SearchMode::ByTitle => {
        let best = song
          .search_terms
          .iter()
          .map(|term| similarity(normalized_query, term))
          .fold(similarity(normalized_query, &song.title), f64::max);
        (best, &song.title)
      }
      SearchMode::ByArtist => (similarity(normalized_query, &song.artist), &song.artist),
    };

    if field.to_lowercase().contains(normalized_query) {
      best = best.max(self.config.containment_floor);
    }

    best
  }

  /// Puntuación final, o `None` si no supera el suelo de relevancia.
  pub fn score(&self, song: &CuratedSong, query: &str, mode: SearchMode) -> Option<f64> {
    let normalized = normalize_query(query);
    if normalized.is_empty() {
      return None;
    }
    self.score_normalized(song, &normalized, mode)
  }

  fn score_normalized(&self, song: &CuratedSong, normalized: &str, mode: SearchMode) -> Option<f64> {
    let base = self.base_score(song, normalized, mode);
    (base > self.config.relevance_floor).then(|| base + song.popularity.prior())
  }

  /// Canciones que superan el suelo, ordenadas y truncadas.
  ///
  /// El orden es estable: a igual puntuación manda el orden del catálogo.
  pub fn scored<'a>(&self, catalog: &'a CuratedCatalog, query: &str, mode: SearchMode) -> Vec<ScoredSong<'a>> {
    let normalized = normalize_query(query);
    if normalized.is_empty() {
      return Vec::new();
    }

    let mut results: Vec<ScoredSong<'a>> = catalog
      .iter()
      .filter_map(|song| self.score_normalized(song, &normalized, mode).map(|score| ScoredSong { song, score }))
      .collect();

    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    results.truncate(self.config.max_results);
    results
  }
}

impl CuratedRanker for FuzzyCuratedRanker {
  fn rank(&self, catalog: &CuratedCatalog, query: &str, mode: SearchMode) -> Vec<SearchCandidate> {
    self
      .scored(catalog, query, mode)
      .into_iter()
      .map(|s| SearchCandidate::curated(&s.song.title, &s.song.artist))
      .collect()
  }
}

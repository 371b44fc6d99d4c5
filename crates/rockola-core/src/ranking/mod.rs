pub mod curated;
pub mod similarity;

pub use curated::{CuratedRanker, FuzzyCuratedRanker, FuzzyRankingConfig, ScoredSong};
pub use similarity::{levenshtein, similarity};

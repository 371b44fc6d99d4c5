pub mod candidate;
pub mod catalog;
pub mod ids;
pub mod rate_limit;
pub mod request;

pub use candidate::{CandidateSource, ExternalSong, SearchCandidate, SearchMode};
pub use catalog::{CuratedCatalog, CuratedSong, Popularity};
pub use rate_limit::{CooldownPolicy, CooldownTier, RateLimitState, RateLimitStatus};
pub use request::{ManualEntry, REQUEST_SOURCE, SongRequest, SubmissionOutcome, UNKNOWN_ARTIST};

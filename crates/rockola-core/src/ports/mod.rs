pub mod clock;
pub mod fun_fact;
pub mod key_value;
pub mod song_search;
pub mod submission;

pub use clock::Clock;
pub use fun_fact::{FunFactError, FunFactProvider};
pub use key_value::{KeyValueStore, StoreError};
pub use song_search::{SearchProviderError, SongSearchProvider};
pub use submission::{RequestSubmitter, SubmissionError};

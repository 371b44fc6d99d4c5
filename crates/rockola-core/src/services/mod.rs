pub mod rate_limiter;
pub mod request_service;
pub mod search_ranker;

pub use rate_limiter::{RATE_LIMIT_KEY, RateLimiter, format_duration};
pub use request_service::{RequestError, RequestReceipt, RequestService};
pub use search_ranker::{SearchLimits, SearchNotice, SearchOutcome, SearchRanker, merge_results};

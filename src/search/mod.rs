//! Text search over in-memory records.
//!
//! - **[`query`]**: query normalization, term splitting and record matching.
//! - **[`cache`]**: bounded, insertion-ordered cache of previous search results.

pub mod cache;
pub mod query;

pub use cache::{CacheStats, DEFAULT_SEARCH_CACHE_CAPACITY, SearchCache};
pub use query::{NormalizedQuery, haystack};

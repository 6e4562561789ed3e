//! Address matching core: normalization, similarity scoring, match engine.
//!
//! Everything in here is pure and synchronous. Callers supply the query
//! address and the candidate set; nothing is cached between calls.
//!
//! CHANGELOG:
//! - 10/16/2026 - Initial module structure

pub mod engine;
pub mod normalize;
pub mod similarity;
pub mod types;

pub use engine::{match_all, match_one};
pub use normalize::normalize_address;
pub use similarity::calculate_similarity;
pub use types::{Candidate, Confidence, MatchMethod, MatchOptions, MatchResult};

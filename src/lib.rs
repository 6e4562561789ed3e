//! fieldops-match library
//!
//! Address normalization and fuzzy matching used to link imported field
//! submissions to jobs and jobs to billing customers, plus the SQLite store,
//! CLI commands and daemon that sit around it.
//!
//! CHANGELOG:
//! - 10/16/2026 - Initial library structure

pub mod adapters;
pub mod commands;
pub mod config;
pub mod daemon;
pub mod db;
pub mod error;
pub mod matching;
pub mod output;

pub use adapters::customers::{
    batch_match_jobs_to_customers, find_all_customer_matches, match_job_to_customer,
    resolve_job_customer, CustomerMatch, MatchOutcome,
};
pub use adapters::jobs::{batch_match_addresses, find_all_matches, match_address_to_job, JobMatch};
pub use error::StoreError;
pub use matching::{
    calculate_similarity, normalize_address, Candidate, Confidence, MatchMethod, MatchOptions,
    MatchResult,
};

//! Job-to-customer matching.
//!
//! Runs when a job is created, to attach it to an existing billing customer
//! instead of creating a duplicate. Unlike the job adapter this one fetches
//! its own candidates from the store.
//!
//! Two flavours:
//! - `resolve_job_customer` reports fetch failures as `MatchOutcome::FetchError`
//! - the `match_*`/`find_*`/`batch_*` functions log the failure and degrade to
//!   "no match", which the creation flow already handles by creating a
//!   customer
//!
//! CHANGELOG:
//! - 10/16/2026 - Added MatchOutcome so fetch failures stay visible
//! - 10/16/2026 - Initial implementation

use rusqlite::Connection;
use serde::Serialize;
use std::collections::HashMap;

use crate::db::helpers;
use crate::error::StoreError;
use crate::matching::{self, Candidate, Confidence, MatchMethod, MatchOptions, MatchResult};

/// Default `min_score` for automatic (single best) linking.
pub const BEST_MATCH_MIN_SCORE: f64 = 0.85;

/// Default `min_score` for the manual review list.
pub const REVIEW_MIN_SCORE: f64 = 0.75;

/// A customer matched to a job address.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerMatch {
    pub customer_id: String,
    pub customer_address: String,
    pub match_score: f64,
    pub match_method: MatchMethod,
    pub confidence: Confidence,
}

impl From<MatchResult> for CustomerMatch {
    fn from(result: MatchResult) -> Self {
        Self {
            customer_id: result.candidate_id,
            customer_address: result.candidate_address,
            match_score: result.score,
            match_method: result.method,
            confidence: result.confidence,
        }
    }
}

/// Result of a customer lookup that keeps fetch failures distinct.
#[derive(Debug)]
pub enum MatchOutcome {
    Found(CustomerMatch),
    NoMatch,
    FetchError(StoreError),
}

impl MatchOutcome {
    /// Collapse to the soft form: failures become `None`.
    pub fn into_match(self) -> Option<CustomerMatch> {
        match self {
            MatchOutcome::Found(m) => Some(m),
            MatchOutcome::NoMatch => None,
            MatchOutcome::FetchError(e) => {
                tracing::warn!(error = %e, "customer fetch failed, treating as no match");
                None
            }
        }
    }
}

fn best_options(options: Option<MatchOptions>) -> MatchOptions {
    options.unwrap_or_else(|| MatchOptions::new(BEST_MATCH_MIN_SCORE))
}

fn fetch_or_empty(conn: &Connection) -> Vec<Candidate> {
    match helpers::fetch_customer_candidates(conn) {
        Ok(candidates) => candidates,
        Err(e) => {
            tracing::warn!(error = %e, "customer fetch failed, treating as no candidates");
            Vec::new()
        }
    }
}

/// Best customer for a job address, against an already-fetched set.
pub fn match_customer_in(
    address: &str,
    customers: &[Candidate],
    options: Option<MatchOptions>,
) -> Option<CustomerMatch> {
    matching::match_one(address, customers, &best_options(options)).map(CustomerMatch::from)
}

/// Best customer for a job address, distinguishing fetch failure.
pub fn resolve_job_customer(
    conn: &Connection,
    address: &str,
    options: Option<MatchOptions>,
) -> MatchOutcome {
    if address.is_empty() {
        return MatchOutcome::NoMatch;
    }

    let customers = match helpers::fetch_customer_candidates(conn) {
        Ok(customers) => customers,
        Err(e) => return MatchOutcome::FetchError(e),
    };

    match match_customer_in(address, &customers, options) {
        Some(m) => MatchOutcome::Found(m),
        None => MatchOutcome::NoMatch,
    }
}

/// Best customer for a job address, or `None` (including on fetch failure).
pub fn match_job_to_customer(
    conn: &Connection,
    address: &str,
    options: Option<MatchOptions>,
) -> Option<CustomerMatch> {
    resolve_job_customer(conn, address, options).into_match()
}

/// Every customer at or above the review threshold, best first.
pub fn find_all_customer_matches(
    conn: &Connection,
    address: &str,
    options: Option<MatchOptions>,
) -> Vec<CustomerMatch> {
    if address.is_empty() {
        return Vec::new();
    }

    let options = options.unwrap_or_else(|| MatchOptions::new(REVIEW_MIN_SCORE));
    let customers = fetch_or_empty(conn);
    matching::match_all(address, &customers, &options)
        .into_iter()
        .map(CustomerMatch::from)
        .collect()
}

/// Match many jobs against customers fetched once. Keyed by job id.
pub fn batch_match_jobs_to_customers(
    conn: &Connection,
    jobs: &[Candidate],
    options: Option<MatchOptions>,
) -> HashMap<String, Option<CustomerMatch>> {
    let options = best_options(options);
    let customers = if jobs.is_empty() {
        Vec::new()
    } else {
        fetch_or_empty(conn)
    };

    let results: HashMap<String, Option<CustomerMatch>> = jobs
        .iter()
        .map(|job| {
            let result = match_customer_in(&job.address, &customers, Some(options));
            (job.id.clone(), result)
        })
        .collect();

    tracing::debug!(
        jobs = jobs.len(),
        matched = results.values().filter(|m| m.is_some()).count(),
        "batch matched jobs to customers"
    );
    results
}

//! Submission-to-job matching.
//!
//! Used by the import flow: each imported field submission carries only an
//! address, and is linked to the job at that address.
//!
//! CHANGELOG:
//! - 10/16/2026 - Initial implementation

use serde::Serialize;
use std::collections::HashMap;

use crate::matching::{self, Candidate, Confidence, MatchMethod, MatchOptions, MatchResult};

/// Default `min_score` for automatic (single best) linking.
pub const BEST_MATCH_MIN_SCORE: f64 = 0.8;

/// Default `min_score` for the manual review list.
pub const REVIEW_MIN_SCORE: f64 = 0.7;

/// A job matched to an address.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobMatch {
    pub job_id: String,
    pub job_address: String,
    pub match_score: f64,
    pub match_method: MatchMethod,
    pub confidence: Confidence,
}

impl From<MatchResult> for JobMatch {
    fn from(result: MatchResult) -> Self {
        Self {
            job_id: result.candidate_id,
            job_address: result.candidate_address,
            match_score: result.score,
            match_method: result.method,
            confidence: result.confidence,
        }
    }
}

/// Best job for `address`, or `None`.
pub fn match_address_to_job(
    address: &str,
    candidates: &[Candidate],
    options: Option<MatchOptions>,
) -> Option<JobMatch> {
    let options = options.unwrap_or_else(|| MatchOptions::new(BEST_MATCH_MIN_SCORE));
    matching::match_one(address, candidates, &options).map(JobMatch::from)
}

/// Every job at or above the review threshold, best first.
pub fn find_all_matches(
    address: &str,
    candidates: &[Candidate],
    options: Option<MatchOptions>,
) -> Vec<JobMatch> {
    let options = options.unwrap_or_else(|| MatchOptions::new(REVIEW_MIN_SCORE));
    matching::match_all(address, candidates, &options)
        .into_iter()
        .map(JobMatch::from)
        .collect()
}

/// Match many addresses against one candidate set.
///
/// Keyed by the raw address; repeated addresses share one entry.
pub fn batch_match_addresses(
    addresses: &[String],
    candidates: &[Candidate],
    options: Option<MatchOptions>,
) -> HashMap<String, Option<JobMatch>> {
    let options = options.unwrap_or_else(|| MatchOptions::new(BEST_MATCH_MIN_SCORE));

    let mut results = HashMap::with_capacity(addresses.len());
    for address in addresses {
        if results.contains_key(address) {
            continue;
        }
        let result = match_address_to_job(address, candidates, Some(options));
        results.insert(address.clone(), result);
    }

    tracing::debug!(
        queries = addresses.len(),
        matched = results.values().filter(|m| m.is_some()).count(),
        "batch matched addresses to jobs"
    );
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jobs() -> Vec<Candidate> {
        vec![
            Candidate::new("a", "123 Main Street Asheville NC"),
            Candidate::new("b", "456 Oak Ave"),
        ]
    }

    #[test]
    fn test_matches_across_formatting() {
        let result = match_address_to_job("123 Main St, Asheville, NC", &jobs(), None).unwrap();
        assert_eq!(result.job_id, "a");
        assert_eq!(result.confidence, Confidence::High);
        assert!(matches!(result.match_method, MatchMethod::Exact | MatchMethod::Fuzzy));
    }

    #[test]
    fn test_different_street_number_never_returned() {
        let all_opts = Some(MatchOptions::new(0.0));
        let result = match_address_to_job("456 Main Street Asheville NC", &jobs(), all_opts);
        // "b" shares the number but not the street; "a" has a different number
        assert!(result.map_or(true, |m| m.job_id != "a"));
    }

    #[test]
    fn test_suffix_variant_prefers_shorter_candidate() {
        let candidates = vec![
            Candidate::new("c", "789 Elm Drive"),
            Candidate::new("d", "789 Elm Drive Suite 2"),
        ];
        let result = match_address_to_job("789 Elm Dr", &candidates, None).unwrap();
        assert_eq!(result.job_id, "c");
    }

    #[test]
    fn test_review_list_is_wider_than_best_match() {
        // "42 broad st" vs "42 broad st unit 9": 7 inserts over 18 chars
        // "42 broad st" vs "42 broad st n": 2 inserts over 13 chars
        let candidates = vec![
            Candidate::new("loose", "42 Broad St Unit 9"),
            Candidate::new("near", "42 Broad St N"),
        ];

        let all = find_all_matches("42 Broad Street", &candidates, Some(MatchOptions::new(0.6)));
        let ids: Vec<&str> = all.iter().map(|m| m.job_id.as_str()).collect();
        assert_eq!(ids, vec!["near", "loose"]);

        let best = match_address_to_job("42 Broad Street", &candidates, None).unwrap();
        assert_eq!(best.job_id, "near");

        let strict =
            match_address_to_job("42 Broad Street", &candidates, Some(MatchOptions::new(0.9)));
        assert!(strict.is_none());
    }

    #[test]
    fn test_default_review_threshold() {
        // 1 - 4/14 = 0.714: in the review list, not a best match
        let candidates = vec![Candidate::new("x", "12 Pine Rd Lot")];
        assert_eq!(find_all_matches("12 Pine Road", &candidates, None).len(), 1);
        assert!(match_address_to_job("12 Pine Road", &candidates, None).is_none());
    }

    #[test]
    fn test_empty_inputs() {
        assert!(match_address_to_job("", &jobs(), None).is_none());
        assert!(match_address_to_job("123 Main St", &[], None).is_none());
        assert!(find_all_matches("", &jobs(), None).is_empty());
    }

    #[test]
    fn test_batch_match_addresses() {
        let addresses = vec![
            "123 Main St, Asheville, NC".to_string(),
            "999 Nowhere Rd".to_string(),
            "123 Main St, Asheville, NC".to_string(),
            String::new(),
        ];
        let results = batch_match_addresses(&addresses, &jobs(), None);
        assert_eq!(results.len(), 3);
        assert_eq!(
            results["123 Main St, Asheville, NC"].as_ref().map(|m| m.job_id.as_str()),
            Some("a")
        );
        assert!(results["999 Nowhere Rd"].is_none());
        assert!(results[""].is_none());
    }
}

//! Match engine: best-match and review-list matching over a candidate set.
//!
//! `match_one` is for unattended linking (conservative, single winner, with a
//! street-number pre-filter). `match_all` feeds a manual review list (every
//! candidate scored, full ranked list).
//!
//! Neither function fails: missing input or nothing above threshold comes
//! back as `None` / an empty list.
//!
//! CHANGELOG:
//! - 10/16/2026 - Initial implementation

use std::cmp::Ordering;

use super::normalize::{normalize_address, street_number};
use super::similarity::calculate_similarity;
use super::types::{Candidate, MatchMethod, MatchOptions, MatchResult};

/// Find the single best candidate for `query`.
///
/// 1. Exact pass: first candidate (input order) whose normalized address
///    equals the normalized query wins with score 1.0.
/// 2. Unless `exact_match_only`, fuzzy pass: candidates whose leading street
///    number differs from the query's are skipped, the rest are scored and
///    kept at `score >= min_score`. Highest score wins; ties keep input order.
pub fn match_one(
    query: &str,
    candidates: &[Candidate],
    options: &MatchOptions,
) -> Option<MatchResult> {
    if query.is_empty() || candidates.is_empty() {
        return None;
    }

    let normalized_query = normalize_address(query);
    if normalized_query.is_empty() {
        return None;
    }

    let normalized: Vec<String> = candidates
        .iter()
        .map(|c| normalize_address(&c.address))
        .collect();

    if let Some(index) = normalized.iter().position(|n| *n == normalized_query) {
        return Some(MatchResult::exact(&candidates[index]));
    }

    if options.exact_match_only {
        return None;
    }

    let query_number = street_number(&normalized_query);

    let mut matches: Vec<MatchResult> = candidates
        .iter()
        .zip(&normalized)
        .filter(|(_, candidate_normalized)| {
            match (query_number, street_number(candidate_normalized)) {
                (Some(q), Some(c)) => q == c,
                _ => true,
            }
        })
        .filter_map(|(candidate, candidate_normalized)| {
            let score = calculate_similarity(&normalized_query, candidate_normalized);
            (score >= options.min_score)
                .then(|| MatchResult::scored(candidate, score, MatchMethod::Fuzzy))
        })
        .collect();

    sort_by_score_desc(&mut matches);
    matches.into_iter().next()
}

/// Score every candidate against `query` and return all at or above
/// `min_score`, best first.
///
/// No street-number pre-filter here: the list is for a person to review.
/// With `exact_match_only` only exact results are returned.
pub fn match_all(
    query: &str,
    candidates: &[Candidate],
    options: &MatchOptions,
) -> Vec<MatchResult> {
    if query.is_empty() || candidates.is_empty() {
        return Vec::new();
    }

    let normalized_query = normalize_address(query);
    if normalized_query.is_empty() {
        return Vec::new();
    }

    let mut matches: Vec<MatchResult> = candidates
        .iter()
        .filter_map(|candidate| {
            let candidate_normalized = normalize_address(&candidate.address);
            if candidate_normalized == normalized_query {
                return Some(MatchResult::scored(candidate, 1.0, MatchMethod::Exact));
            }
            if options.exact_match_only {
                return None;
            }
            let score = calculate_similarity(&normalized_query, &candidate_normalized);
            (score >= options.min_score)
                .then(|| MatchResult::scored(candidate, score, MatchMethod::Fuzzy))
        })
        .collect();

    sort_by_score_desc(&mut matches);
    matches
}

/// Stable descending sort, so equal scores keep input order.
fn sort_by_score_desc(matches: &mut [MatchResult]) {
    matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::types::Confidence;

    fn candidates(rows: &[(&str, &str)]) -> Vec<Candidate> {
        rows.iter().map(|(id, addr)| Candidate::new(*id, *addr)).collect()
    }

    #[test]
    fn test_empty_inputs() {
        let opts = MatchOptions::new(0.8);
        let cands = candidates(&[("a", "123 Main St")]);
        assert!(match_one("", &cands, &opts).is_none());
        assert!(match_one("123 Main St", &[], &opts).is_none());
        assert!(match_all("", &cands, &opts).is_empty());
        assert!(match_all("123 Main St", &[], &opts).is_empty());
    }

    #[test]
    fn test_query_that_normalizes_to_nothing() {
        let opts = MatchOptions::new(0.0);
        let cands = candidates(&[("a", ""), ("b", "#")]);
        assert!(match_one(" , ", &cands, &opts).is_none());
        assert!(match_all(" , ", &cands, &opts).is_empty());
    }

    #[test]
    fn test_exact_match_wins() {
        let cands = candidates(&[
            ("a", "123 Main Street Asheville NC"),
            ("b", "456 Oak Ave"),
        ]);
        let result =
            match_one("123 Main St, Asheville, NC", &cands, &MatchOptions::new(0.8)).unwrap();
        assert_eq!(result.candidate_id, "a");
        assert_eq!(result.method, MatchMethod::Exact);
        assert_eq!(result.confidence, Confidence::High);
        assert_eq!(result.score, 1.0);
        assert_eq!(result.candidate_address, "123 Main Street Asheville NC");
    }

    #[test]
    fn test_first_exact_in_input_order() {
        let cands = candidates(&[
            ("first", "9 Pine Rd"),
            ("second", "9 pine road"),
        ]);
        let result = match_one("9 Pine Road", &cands, &MatchOptions::new(0.8)).unwrap();
        assert_eq!(result.candidate_id, "first");
    }

    #[test]
    fn test_exact_only_skips_fuzzy() {
        let cands = candidates(&[("a", "123 Main St Apt 1")]);
        let opts = MatchOptions::new(0.5).exact_only(true);
        assert!(match_one("123 Main St", &cands, &opts).is_none());
        assert!(match_all("123 Main St", &cands, &opts).is_empty());

        let loose = MatchOptions::new(0.5);
        assert!(match_one("123 Main St", &cands, &loose).is_some());
    }

    #[test]
    fn test_street_number_prefilter() {
        // 0.909 similar, but a different house
        let cands = candidates(&[("other", "124 Main St")]);
        let opts = MatchOptions::new(0.5);
        assert!(match_one("123 Main St", &cands, &opts).is_none());

        // The review list still shows it
        let all = match_all("123 Main St", &cands, &opts);
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].candidate_id, "other");
    }

    #[test]
    fn test_prefilter_needs_numbers_on_both_sides() {
        let cands = candidates(&[("a", "Main St Asheville")]);
        let result = match_one("12 Main St Asheville", &cands, &MatchOptions::new(0.8)).unwrap();
        assert_eq!(result.candidate_id, "a");
        assert_eq!(result.method, MatchMethod::Fuzzy);
    }

    #[test]
    fn test_prefers_closer_candidate() {
        let cands = candidates(&[
            ("suite", "789 Elm Drive Suite 2"),
            ("close", "789 Elm Drv"),
        ]);
        let result = match_one("789 Elm Dr", &cands, &MatchOptions::new(0.5)).unwrap();
        assert_eq!(result.candidate_id, "close");
        assert_eq!(result.method, MatchMethod::Fuzzy);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let cands = candidates(&[
            ("first", "10 Oak Ln X"),
            ("second", "10 Oak Ln Y"),
        ]);
        let result = match_one("10 Oak Ln", &cands, &MatchOptions::new(0.5)).unwrap();
        assert_eq!(result.candidate_id, "first");

        let all = match_all("10 Oak Ln", &cands, &MatchOptions::new(0.5));
        let ids: Vec<&str> = all.iter().map(|m| m.candidate_id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second"]);
    }

    #[test]
    fn test_min_score_is_inclusive() {
        // "10 oak ln" vs "10 oak ln x": 2 inserts over 11 chars
        let cands = candidates(&[("a", "10 Oak Ln X")]);
        let score = 1.0 - 2.0 / 11.0;
        assert!(match_one("10 Oak Ln", &cands, &MatchOptions::new(score)).is_some());
        assert!(match_one("10 Oak Ln", &cands, &MatchOptions::new(score + 1e-9)).is_none());
    }

    #[test]
    fn test_match_one_score_never_below_threshold() {
        let cands = candidates(&[
            ("a", "55 River Rd"),
            ("b", "55 Rivers Rd"),
            ("c", "55 Riverside Dr"),
            ("d", "Lake Rd"),
        ]);
        for threshold in [0.0, 0.3, 0.6, 0.8, 0.9, 1.0] {
            let options = MatchOptions::new(threshold);
            if let Some(m) = match_one("55 River Road Apt 3", &cands, &options) {
                assert!(m.score >= threshold);
            }
        }
    }

    #[test]
    fn test_match_all_sorted_and_labelled() {
        let cands = candidates(&[
            ("loose", "123 Main St Apt 4"),
            ("exact", "123 Main Street"),
            ("far", "9 Unrelated Blvd"),
        ]);
        let all = match_all("123 Main St", &cands, &MatchOptions::new(0.6));
        let ids: Vec<&str> = all.iter().map(|m| m.candidate_id.as_str()).collect();
        assert_eq!(ids, vec!["exact", "loose"]);
        assert_eq!(all[0].method, MatchMethod::Exact);
        assert_eq!(all[0].confidence, Confidence::High);
        assert_eq!(all[1].method, MatchMethod::Fuzzy);
        assert!(all[0].score >= all[1].score);
    }
}

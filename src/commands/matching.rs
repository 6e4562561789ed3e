//! Matching commands: normalize, similarity, match-job, job-matches.
//!
//! CHANGELOG:
//! - 10/16/2026 - Initial implementation

use anyhow::{Context, Result};
use rusqlite::Connection;
use serde_json::json;

use crate::adapters::jobs::{self, JobMatch};
use crate::db::helpers;
use crate::matching::{calculate_similarity, normalize_address, MatchOptions};
use crate::output::OutputControls;

/// Print the normalized form of an address.
pub fn normalize(address: &str, output: &OutputControls) -> Result<()> {
    let normalized = normalize_address(address);

    if output.json {
        output.print(&json!({
            "address": address,
            "normalized": normalized,
        }));
    } else {
        println!("{}", normalized);
    }
    Ok(())
}

/// Print the similarity of two addresses after normalization.
pub fn similarity(a: &str, b: &str, output: &OutputControls) -> Result<()> {
    let norm_a = normalize_address(a);
    let norm_b = normalize_address(b);
    let score = calculate_similarity(&norm_a, &norm_b);

    if output.json {
        output.print(&json!({
            "a": norm_a,
            "b": norm_b,
            "score": score,
        }));
    } else {
        println!("{}", norm_a);
        println!("{}", norm_b);
        println!("score: {:.4}", score);
    }
    Ok(())
}

pub(crate) fn print_job_match(m: &JobMatch) {
    println!(
        "{}  {:.3}  {:<6}  {:<6}  {}",
        m.job_id, m.match_score, m.match_method, m.confidence, m.job_address
    );
}

/// Best job for an address.
pub fn match_job(
    conn: &Connection,
    address: &str,
    options: MatchOptions,
    output: &OutputControls,
) -> Result<()> {
    let candidates = helpers::fetch_job_candidates(conn).context("Failed to load jobs")?;
    let result = jobs::match_address_to_job(address, &candidates, Some(options));

    if output.json {
        output.print(&json!({
            "address": address,
            "match": result,
        }));
    } else {
        match result {
            Some(ref m) => print_job_match(m),
            None => println!("No job matches '{}' (min score {:.2})", address, options.min_score),
        }
    }
    Ok(())
}

/// Ranked job list for manual review.
pub fn job_matches(
    conn: &Connection,
    address: &str,
    options: MatchOptions,
    output: &OutputControls,
) -> Result<()> {
    let candidates = helpers::fetch_job_candidates(conn).context("Failed to load jobs")?;
    let results = jobs::find_all_matches(address, &candidates, Some(options));

    if output.json {
        output.print(&results);
    } else {
        if results.is_empty() {
            println!("No jobs within {:.2} of '{}'", options.min_score, address);
            return Ok(());
        }
        println!("Job matches ({}):", results.len());
        println!("{}", "-".repeat(60));
        for m in &results {
            print_job_match(m);
        }
    }
    Ok(())
}

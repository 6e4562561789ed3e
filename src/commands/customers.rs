//! Customer commands: match-customer, customer-matches, link-customers,
//! link-job, add-customer, customers.
//!
//! CHANGELOG:
//! - 10/16/2026 - Added batch and manual linking
//! - 10/16/2026 - Initial implementation

use anyhow::{anyhow, bail, Context, Result};
use rusqlite::Connection;
use serde::Serialize;
use serde_json::json;

use crate::adapters::customers::{self, CustomerMatch, MatchOutcome};
use crate::db::helpers;
use crate::matching::{MatchMethod, MatchOptions};
use crate::output::OutputControls;

fn print_customer_match(m: &CustomerMatch) {
    println!(
        "{}  {:.3}  {:<6}  {:<6}  {}",
        m.customer_id, m.match_score, m.match_method, m.confidence, m.customer_address
    );
}

/// Best customer for an address. A store failure is an error here, not
/// "no match".
pub fn match_customer(
    conn: &Connection,
    address: &str,
    options: MatchOptions,
    output: &OutputControls,
) -> Result<()> {
    let result = match customers::resolve_job_customer(conn, address, Some(options)) {
        MatchOutcome::Found(m) => Some(m),
        MatchOutcome::NoMatch => None,
        MatchOutcome::FetchError(e) => {
            return Err(anyhow!(e).context("Failed to load customers"));
        }
    };

    if output.json {
        output.print(&json!({
            "address": address,
            "match": result,
        }));
    } else {
        match result {
            Some(ref m) => print_customer_match(m),
            None => println!(
                "No customer matches '{}' (min score {:.2})",
                address, options.min_score
            ),
        }
    }
    Ok(())
}

/// Ranked customer list for manual review.
pub fn customer_matches(
    conn: &Connection,
    address: &str,
    options: MatchOptions,
    output: &OutputControls,
) -> Result<()> {
    let results = customers::find_all_customer_matches(conn, address, Some(options));

    if output.json {
        output.print(&results);
    } else {
        if results.is_empty() {
            println!("No customers within {:.2} of '{}'", options.min_score, address);
            return Ok(());
        }
        println!("Customer matches ({}):", results.len());
        println!("{}", "-".repeat(60));
        for m in &results {
            print_customer_match(m);
        }
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct LinkSummary {
    pub jobs_checked: usize,
    pub linked: Vec<LinkedJob>,
    pub unmatched: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct LinkedJob {
    pub job_id: String,
    #[serde(flatten)]
    pub customer: CustomerMatch,
}

/// Match every job without a customer and persist the links.
pub fn link_unlinked_jobs(conn: &Connection, options: MatchOptions) -> Result<LinkSummary> {
    let jobs = helpers::fetch_unlinked_jobs(conn).context("Failed to load unlinked jobs")?;
    let results = customers::batch_match_jobs_to_customers(conn, &jobs, Some(options));

    let mut summary = LinkSummary {
        jobs_checked: jobs.len(),
        linked: Vec::new(),
        unmatched: Vec::new(),
    };

    // Walk `jobs` rather than the map to keep creation order
    for job in &jobs {
        match results.get(&job.id).cloned().flatten() {
            Some(m) => {
                helpers::link_job_to_customer(
                    conn,
                    &job.id,
                    &m.customer_id,
                    m.match_score,
                    m.match_method,
                )?;
                summary.linked.push(LinkedJob {
                    job_id: job.id.clone(),
                    customer: m,
                });
            }
            None => summary.unmatched.push(job.id.clone()),
        }
    }

    tracing::info!(
        checked = summary.jobs_checked,
        linked = summary.linked.len(),
        "linked jobs to customers"
    );
    Ok(summary)
}

pub fn link_customers(
    conn: &Connection,
    options: MatchOptions,
    output: &OutputControls,
) -> Result<()> {
    let summary = link_unlinked_jobs(conn, options)?;

    if output.json {
        output.print(&summary);
    } else {
        println!(
            "Checked {} jobs: {} linked, {} left for review",
            summary.jobs_checked,
            summary.linked.len(),
            summary.unmatched.len()
        );
        for linked in &summary.linked {
            print!("{} -> ", linked.job_id);
            print_customer_match(&linked.customer);
        }
    }
    Ok(())
}

/// Link a job to a customer chosen by a person.
pub fn link_job(
    conn: &Connection,
    job_id: &str,
    customer_id: &str,
    output: &OutputControls,
) -> Result<()> {
    if !helpers::customer_exists(conn, customer_id)? {
        bail!("Customer '{}' not found", customer_id);
    }
    helpers::link_job_to_customer(conn, job_id, customer_id, 1.0, MatchMethod::Manual)?;

    if output.json {
        output.print(&json!({
            "success": true,
            "job_id": job_id,
            "customer_id": customer_id,
            "match_method": MatchMethod::Manual,
        }));
    } else {
        println!("Linked job {} to customer {}", job_id, customer_id);
    }
    Ok(())
}

/// Add a customer.
pub fn add(
    conn: &Connection,
    name: &str,
    address: Option<&str>,
    output: &OutputControls,
) -> Result<()> {
    let id = helpers::insert_customer(conn, name, address)?;

    if output.json {
        output.print(&json!({
            "success": true,
            "customer_id": id,
            "name": name,
            "address": address,
        }));
    } else {
        println!("Added customer: {} ({})", name, id);
    }
    Ok(())
}

/// List all customers.
pub fn list(conn: &Connection, output: &OutputControls) -> Result<()> {
    let all = helpers::list_customers(conn)?;

    if output.json {
        output.print(&all);
    } else {
        if all.is_empty() {
            println!("No customers found.");
            return Ok(());
        }
        println!("Customers ({}):", all.len());
        println!("{}", "-".repeat(60));
        for c in &all {
            println!("{}: {} [{}]", c.id, c.name, c.address.as_deref().unwrap_or("-"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::helpers::{insert_customer, insert_job, list_jobs, test_conn};

    #[test]
    fn test_link_unlinked_jobs() {
        let conn = test_conn();
        let ada = insert_customer(&conn, "Ada", Some("12 Birch Lane, Boone, NC")).unwrap();
        let near = insert_job(&conn, "Roof", Some("12 Birch Ln Boone North Carolina")).unwrap();
        let far = insert_job(&conn, "Fence", Some("900 Summit Pkwy")).unwrap();
        insert_job(&conn, "No address", None).unwrap();

        let opts = MatchOptions::new(customers::BEST_MATCH_MIN_SCORE);
        let summary = link_unlinked_jobs(&conn, opts).unwrap();
        assert_eq!(summary.jobs_checked, 2);
        assert_eq!(summary.linked.len(), 1);
        assert_eq!(summary.linked[0].job_id, near);
        assert_eq!(summary.linked[0].customer.customer_id, ada);
        assert_eq!(summary.unmatched, vec![far]);

        // Second run has nothing left to link
        let again = link_unlinked_jobs(&conn, MatchOptions::new(0.85)).unwrap();
        assert_eq!(again.jobs_checked, 1);
        assert!(again.linked.is_empty());
    }

    #[test]
    fn test_manual_link() {
        let conn = test_conn();
        let ada = insert_customer(&conn, "Ada", Some("1 Main St")).unwrap();
        let job = insert_job(&conn, "Paint", Some("Lot 4, Hwy 19")).unwrap();
        let output = OutputControls::default();

        link_job(&conn, &job, &ada, &output).unwrap();
        let jobs = list_jobs(&conn).unwrap();
        assert_eq!(jobs[0].customer_match_method, Some(MatchMethod::Manual));

        assert!(link_job(&conn, &job, "nobody", &output).is_err());
        assert!(link_job(&conn, "no-job", &ada, &output).is_err());
    }
}

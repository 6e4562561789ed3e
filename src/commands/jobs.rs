//! Job commands: add-job (with customer auto-link), jobs.
//!
//! CHANGELOG:
//! - 10/16/2026 - Job creation runs in one transaction; address-less links are manual
//! - 10/16/2026 - Initial implementation

use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

use crate::adapters::customers::{self, CustomerMatch, MatchOutcome};
use crate::db::helpers;
use crate::matching::{MatchMethod, MatchOptions};
use crate::output::OutputControls;

/// What happened to the customer link when a job was created.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CustomerLink {
    /// Linked to an existing customer.
    Matched(CustomerMatch),
    /// No existing customer matched; a new one was created from the job.
    Created { customer_id: String },
    /// No match and no customer name to create one with.
    Unlinked,
    /// Customers could not be loaded; left for a later `link-customers`.
    Deferred { error: String },
}

#[derive(Debug, Serialize)]
pub struct CreatedJob {
    pub job_id: String,
    pub title: String,
    pub address: Option<String>,
    pub customer: CustomerLink,
}

/// Create a job and attach it to a customer.
///
/// The job, any new customer and the link are written in one transaction.
/// A failed customer fetch leaves the job unlinked instead of creating a
/// customer that may well already exist.
pub fn create_job(
    conn: &Connection,
    title: &str,
    address: Option<&str>,
    customer_name: Option<&str>,
    options: MatchOptions,
) -> Result<CreatedJob> {
    let tx = conn.unchecked_transaction()?;
    let job_id = helpers::insert_job(&tx, title, address)?;

    let address = address.filter(|addr| !addr.trim().is_empty());
    let outcome = match address {
        Some(addr) => customers::resolve_job_customer(&tx, addr, Some(options)),
        None => MatchOutcome::NoMatch,
    };

    let customer = match outcome {
        MatchOutcome::Found(m) => {
            helpers::link_job_to_customer(
                &tx,
                &job_id,
                &m.customer_id,
                m.match_score,
                m.match_method,
            )?;
            CustomerLink::Matched(m)
        }
        MatchOutcome::NoMatch => match customer_name {
            Some(name) => {
                let customer_id = helpers::insert_customer(&tx, name, address)?;
                // Same address on both sides; without one nothing was compared
                let method = if address.is_some() {
                    MatchMethod::Exact
                } else {
                    MatchMethod::Manual
                };
                helpers::link_job_to_customer(&tx, &job_id, &customer_id, 1.0, method)?;
                CustomerLink::Created { customer_id }
            }
            None => CustomerLink::Unlinked,
        },
        MatchOutcome::FetchError(e) => {
            tracing::warn!(
                job_id = %job_id,
                error = %e,
                "customer lookup failed, job left unlinked"
            );
            CustomerLink::Deferred {
                error: e.to_string(),
            }
        }
    };

    tx.commit()?;

    Ok(CreatedJob {
        job_id,
        title: title.to_string(),
        address: address.map(String::from),
        customer,
    })
}

pub fn add(
    conn: &Connection,
    title: &str,
    address: Option<&str>,
    customer_name: Option<&str>,
    options: MatchOptions,
    output: &OutputControls,
) -> Result<()> {
    let created = create_job(conn, title, address, customer_name, options)?;

    if output.json {
        output.print(&created);
    } else {
        println!("Added job: {} ({})", created.title, created.job_id);
        match &created.customer {
            CustomerLink::Matched(m) => println!(
                "  Customer: {} ({} match, score {:.3}, {} confidence)",
                m.customer_id, m.match_method, m.match_score, m.confidence
            ),
            CustomerLink::Created { customer_id } => {
                println!("  Customer: {} (new)", customer_id)
            }
            CustomerLink::Unlinked => println!("  Customer: none matched"),
            CustomerLink::Deferred { error } => println!("  Customer: lookup failed ({})", error),
        }
    }
    Ok(())
}

/// List all jobs.
pub fn list(conn: &Connection, output: &OutputControls) -> Result<()> {
    let all = helpers::list_jobs(conn)?;

    if output.json {
        output.print(&all);
    } else {
        if all.is_empty() {
            println!("No jobs found.");
            return Ok(());
        }
        println!("Jobs ({}):", all.len());
        println!("{}", "-".repeat(60));
        for j in &all {
            let customer = match (&j.customer_id, j.customer_match_method) {
                (Some(id), Some(method)) => format!(" -> {} ({})", id, method),
                (Some(id), None) => format!(" -> {}", id),
                _ => String::new(),
            };
            println!(
                "{}: {} [{}]{}",
                j.id,
                j.title,
                j.address.as_deref().unwrap_or("-"),
                customer
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::helpers::{insert_customer, list_customers, list_jobs, test_conn};

    fn opts() -> MatchOptions {
        MatchOptions::new(customers::BEST_MATCH_MIN_SCORE)
    }

    #[test]
    fn test_links_existing_customer() {
        let conn = test_conn();
        let ada = insert_customer(&conn, "Ada", Some("88 Haywood Road, Asheville, NC")).unwrap();

        let created =
            create_job(&conn, "Window", Some("88 Haywood Rd Asheville"), Some("Ada"), opts())
                .unwrap();
        // "88 haywood rd asheville" vs "... nc": 3 inserts over 26 chars
        match created.customer {
            CustomerLink::Matched(m) => {
                assert_eq!(m.customer_id, ada);
                assert_eq!(m.match_method, MatchMethod::Fuzzy);
            }
            other => panic!("expected match, got {:?}", other),
        }
        assert_eq!(list_customers(&conn).unwrap().len(), 1);
    }

    #[test]
    fn test_creates_customer_when_nothing_matches() {
        let conn = test_conn();
        insert_customer(&conn, "Ada", Some("1 Main St")).unwrap();

        let created = create_job(&conn, "Deck", Some("500 Lake Dr"), Some("Bo"), opts()).unwrap();
        let customer_id = match created.customer {
            CustomerLink::Created { customer_id } => customer_id,
            other => panic!("expected new customer, got {:?}", other),
        };
        assert_eq!(list_customers(&conn).unwrap().len(), 2);
        let jobs = list_jobs(&conn).unwrap();
        assert_eq!(jobs[0].customer_id.as_deref(), Some(customer_id.as_str()));
    }

    #[test]
    fn test_unlinked_without_customer_name() {
        let conn = test_conn();
        let created = create_job(&conn, "Deck", Some("500 Lake Dr"), None, opts()).unwrap();
        assert!(matches!(created.customer, CustomerLink::Unlinked));

        let created = create_job(&conn, "Quote", None, Some("Cy"), opts()).unwrap();
        assert!(matches!(created.customer, CustomerLink::Created { .. }));
    }

    #[test]
    fn test_new_customer_without_address_is_manual_link() {
        let conn = test_conn();
        let created = create_job(&conn, "Quote", None, Some("Cy"), opts()).unwrap();

        let job = list_jobs(&conn)
            .unwrap()
            .into_iter()
            .find(|j| j.id == created.job_id)
            .unwrap();
        assert_eq!(job.customer_match_method, Some(MatchMethod::Manual));

        let created = create_job(&conn, "Deck", Some("500 Lake Dr"), Some("Bo"), opts()).unwrap();
        let job = list_jobs(&conn)
            .unwrap()
            .into_iter()
            .find(|j| j.id == created.job_id)
            .unwrap();
        assert_eq!(job.customer_match_method, Some(MatchMethod::Exact));
    }

    #[test]
    fn test_fetch_failure_defers_instead_of_duplicating() {
        let conn = test_conn();
        // Customers become unreadable while job inserts still succeed
        conn.execute_batch(
            "PRAGMA foreign_keys = OFF;
             ALTER TABLE customers RENAME TO customers_offline;",
        )
        .unwrap();

        let created = create_job(&conn, "Deck", Some("500 Lake Dr"), Some("Bo"), opts()).unwrap();
        assert!(matches!(created.customer, CustomerLink::Deferred { .. }));

        let customers: i64 = conn
            .query_row("SELECT COUNT(*) FROM customers_offline", [], |row| row.get(0))
            .unwrap();
        assert_eq!(customers, 0);
        let jobs: i64 = conn
            .query_row("SELECT COUNT(*) FROM jobs WHERE customer_id IS NULL", [], |row| row.get(0))
            .unwrap();
        assert_eq!(jobs, 1);
    }
}

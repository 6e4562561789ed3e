//! Store helpers shared by CLI commands and the daemon service.
//!
//! Every function takes `&Connection` so the same code serves a fresh CLI
//! connection and the daemon's long-lived one.
//!
//! CHANGELOG:
//! - 10/16/2026 - Added submission import and link writes
//! - 10/16/2026 - Initial implementation

use chrono::{SecondsFormat, Utc};
use rusqlite::{params, Connection};
use serde::Serialize;

use super::queries;
use crate::error::StoreError;
use crate::matching::{Candidate, MatchMethod};

// ============================================================================
// Data Structures
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CustomerRow {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobRow {
    pub id: String,
    pub title: String,
    pub address: Option<String>,
    pub customer_id: Option<String>,
    pub customer_match_score: Option<f64>,
    pub customer_match_method: Option<MatchMethod>,
    pub created_at: String,
}

fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

// ============================================================================
// Schema
// ============================================================================

/// Create tables and indexes if they don't exist.
pub fn init_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(queries::SCHEMA)?;
    Ok(())
}

// ============================================================================
// Candidate Fetches
// ============================================================================

fn fetch_candidates(conn: &Connection, sql: &str) -> Result<Vec<Candidate>, StoreError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], |row: &rusqlite::Row| {
        Ok(Candidate {
            id: row.get(0)?,
            address: row.get(1)?,
        })
    })?;

    let candidates = rows.collect::<Result<Vec<_>, _>>()?;
    Ok(candidates)
}

/// Jobs with a non-empty address, in creation order.
pub fn fetch_job_candidates(conn: &Connection) -> Result<Vec<Candidate>, StoreError> {
    let candidates = fetch_candidates(conn, queries::JOB_CANDIDATES)?;
    tracing::debug!(count = candidates.len(), "fetched job candidates");
    Ok(candidates)
}

/// Customers with a non-empty address, in creation order.
pub fn fetch_customer_candidates(conn: &Connection) -> Result<Vec<Candidate>, StoreError> {
    let candidates = fetch_candidates(conn, queries::CUSTOMER_CANDIDATES)?;
    tracing::debug!(count = candidates.len(), "fetched customer candidates");
    Ok(candidates)
}

/// Jobs with an address and no customer link.
pub fn fetch_unlinked_jobs(conn: &Connection) -> Result<Vec<Candidate>, StoreError> {
    fetch_candidates(conn, queries::UNLINKED_JOBS)
}

// ============================================================================
// Inserts
// ============================================================================

/// Insert a customer and return its new id.
pub fn insert_customer(
    conn: &Connection,
    name: &str,
    address: Option<&str>,
) -> Result<String, StoreError> {
    let id = new_id();
    conn.execute(
        queries::INSERT_CUSTOMER,
        params![id, name, address, now_timestamp()],
    )?;
    tracing::info!(customer_id = %id, "created customer");
    Ok(id)
}

/// Insert a job (no customer link yet) and return its new id.
pub fn insert_job(
    conn: &Connection,
    title: &str,
    address: Option<&str>,
) -> Result<String, StoreError> {
    let id = new_id();
    conn.execute(queries::INSERT_JOB, params![id, title, address, now_timestamp()])?;
    tracing::info!(job_id = %id, "created job");
    Ok(id)
}

/// Insert an imported submission. Uses `id` when the source provides one.
pub fn insert_submission(
    conn: &Connection,
    id: Option<&str>,
    address: Option<&str>,
    payload: &serde_json::Value,
) -> Result<String, StoreError> {
    let id = id.map(String::from).unwrap_or_else(new_id);
    let payload = serde_json::to_string(payload)
        .map_err(|e| StoreError::InvalidValue(format!("submission payload: {}", e)))?;
    conn.execute(
        queries::INSERT_SUBMISSION,
        params![id, address, payload, now_timestamp()],
    )?;
    Ok(id)
}

pub fn submission_exists(conn: &Connection, id: &str) -> Result<bool, StoreError> {
    let count: i64 = conn.query_row(queries::SUBMISSION_EXISTS, [id], |row| row.get(0))?;
    Ok(count > 0)
}

pub fn customer_exists(conn: &Connection, id: &str) -> Result<bool, StoreError> {
    let count: i64 = conn.query_row(queries::CUSTOMER_EXISTS, [id], |row| row.get(0))?;
    Ok(count > 0)
}

// ============================================================================
// Link Writes
// ============================================================================

/// Record which job a submission belongs to.
pub fn link_submission_to_job(
    conn: &Connection,
    submission_id: &str,
    job_id: &str,
    score: f64,
    method: MatchMethod,
) -> Result<(), StoreError> {
    let updated = conn.execute(
        queries::LINK_SUBMISSION,
        params![submission_id, job_id, score, method.as_str()],
    )?;
    if updated == 0 {
        return Err(StoreError::NotFound {
            kind: "submission",
            id: submission_id.to_string(),
        });
    }
    Ok(())
}

/// Record which customer a job bills to.
pub fn link_job_to_customer(
    conn: &Connection,
    job_id: &str,
    customer_id: &str,
    score: f64,
    method: MatchMethod,
) -> Result<(), StoreError> {
    let updated = conn.execute(
        queries::LINK_JOB_CUSTOMER,
        params![job_id, customer_id, score, method.as_str()],
    )?;
    if updated == 0 {
        return Err(StoreError::NotFound {
            kind: "job",
            id: job_id.to_string(),
        });
    }
    tracing::info!(job_id, customer_id, method = %method, score, "linked job to customer");
    Ok(())
}

// ============================================================================
// Listings
// ============================================================================

pub fn list_customers(conn: &Connection) -> Result<Vec<CustomerRow>, StoreError> {
    let mut stmt = conn.prepare(queries::LIST_CUSTOMERS)?;
    let rows = stmt.query_map([], |row: &rusqlite::Row| {
        Ok(CustomerRow {
            id: row.get(0)?,
            name: row.get(1)?,
            address: row.get(2)?,
            created_at: row.get(3)?,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub fn list_jobs(conn: &Connection) -> Result<Vec<JobRow>, StoreError> {
    let mut stmt = conn.prepare(queries::LIST_JOBS)?;
    let rows = stmt.query_map([], |row: &rusqlite::Row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, Option<String>>(2)?,
            row.get::<_, Option<String>>(3)?,
            row.get::<_, Option<f64>>(4)?,
            row.get::<_, Option<String>>(5)?,
            row.get::<_, String>(6)?,
        ))
    })?;

    let mut jobs = Vec::new();
    for row in rows {
        let (id, title, address, customer_id, score, method, created_at) = row?;
        let customer_match_method = method
            .map(|m| m.parse::<MatchMethod>().map_err(StoreError::InvalidValue))
            .transpose()?;
        jobs.push(JobRow {
            id,
            title,
            address,
            customer_id,
            customer_match_score: score,
            customer_match_method,
            created_at,
        });
    }
    Ok(jobs)
}

/// Job the submission was linked to, if any.
#[cfg(test)]
pub(crate) fn submission_job(
    conn: &Connection,
    submission_id: &str,
) -> Result<Option<String>, StoreError> {
    use rusqlite::OptionalExtension;

    let job: Option<Option<String>> = conn
        .query_row(
            "SELECT job_id FROM submissions WHERE id = ?1",
            [submission_id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(job.flatten())
}

#[cfg(test)]
pub(crate) fn test_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    conn
}

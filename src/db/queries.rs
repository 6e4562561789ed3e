//! SQL for the jobs/customers/submissions store.
//!
//! CHANGELOG:
//! - 10/16/2026 - Initial schema and query constants

/// Tables used by the matching flows. Safe to run repeatedly.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS customers (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    address     TEXT,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS jobs (
    id                      TEXT PRIMARY KEY,
    title                   TEXT NOT NULL,
    address                 TEXT,
    customer_id             TEXT REFERENCES customers(id),
    customer_match_score    REAL,
    customer_match_method   TEXT,
    created_at              TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS submissions (
    id            TEXT PRIMARY KEY,
    address       TEXT,
    payload       TEXT,
    job_id        TEXT REFERENCES jobs(id),
    match_score   REAL,
    match_method  TEXT,
    imported_at   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_jobs_customer ON jobs(customer_id);
CREATE INDEX IF NOT EXISTS idx_submissions_job ON submissions(job_id);
"#;

/// Job candidates for submission matching, oldest first.
pub const JOB_CANDIDATES: &str = r#"
SELECT id, address
FROM jobs
WHERE address IS NOT NULL AND TRIM(address) != ''
ORDER BY created_at ASC, id ASC
"#;

/// Customer candidates for job matching, oldest first.
pub const CUSTOMER_CANDIDATES: &str = r#"
SELECT id, address
FROM customers
WHERE address IS NOT NULL AND TRIM(address) != ''
ORDER BY created_at ASC, id ASC
"#;

/// Jobs that have an address but no linked customer yet.
pub const UNLINKED_JOBS: &str = r#"
SELECT id, address
FROM jobs
WHERE customer_id IS NULL
  AND address IS NOT NULL AND TRIM(address) != ''
ORDER BY created_at ASC, id ASC
"#;

pub const INSERT_CUSTOMER: &str = r#"
INSERT INTO customers (id, name, address, created_at)
VALUES (?1, ?2, ?3, ?4)
"#;

pub const INSERT_JOB: &str = r#"
INSERT INTO jobs (id, title, address, created_at)
VALUES (?1, ?2, ?3, ?4)
"#;

pub const INSERT_SUBMISSION: &str = r#"
INSERT INTO submissions (id, address, payload, imported_at)
VALUES (?1, ?2, ?3, ?4)
"#;

pub const LINK_SUBMISSION: &str = r#"
UPDATE submissions
SET job_id = ?2, match_score = ?3, match_method = ?4
WHERE id = ?1
"#;

pub const LINK_JOB_CUSTOMER: &str = r#"
UPDATE jobs
SET customer_id = ?2, customer_match_score = ?3, customer_match_method = ?4
WHERE id = ?1
"#;

pub const CUSTOMER_EXISTS: &str = "SELECT COUNT(*) FROM customers WHERE id = ?1";

pub const SUBMISSION_EXISTS: &str = "SELECT COUNT(*) FROM submissions WHERE id = ?1";

pub const LIST_CUSTOMERS: &str = r#"
SELECT id, name, address, created_at
FROM customers
ORDER BY created_at ASC, id ASC
"#;

pub const LIST_JOBS: &str = r#"
SELECT id, title, address, customer_id, customer_match_score, customer_match_method, created_at
FROM jobs
ORDER BY created_at ASC, id ASC
"#;

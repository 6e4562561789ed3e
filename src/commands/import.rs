//! Import command: load field submissions and link each to a job.
//!
//! Job candidates are fetched once per import. A submission whose address
//! matches no job gets a new job, which later submissions in the same file
//! can then match.
//!
//! CHANGELOG:
//! - 10/16/2026 - Accept numeric submission ids
//! - 10/16/2026 - Initial implementation

use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::adapters::jobs;
use crate::db::helpers;
use crate::matching::{Candidate, Confidence, MatchMethod, MatchOptions};
use crate::output::OutputControls;

/// Wrapper for `{"submissions": [...]}` files.
#[derive(Debug, Deserialize)]
struct SubmissionsFile {
    submissions: Vec<Value>,
}

/// Load submissions from a JSON file.
///
/// Supports both formats:
/// - `{"submissions": [...]}`
/// - `[...]` (flat array)
pub fn load_submissions<P: AsRef<Path>>(path: P) -> Result<Vec<Value>> {
    let content = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read submissions file: {:?}", path.as_ref()))?;
    parse_submissions(&content)
}

fn parse_submissions(content: &str) -> Result<Vec<Value>> {
    if let Ok(wrapper) = serde_json::from_str::<SubmissionsFile>(content) {
        return Ok(wrapper.submissions);
    }
    serde_json::from_str(content).context("Failed to parse submissions JSON")
}

#[derive(Debug, Serialize)]
pub struct ImportedSubmission {
    pub submission_id: String,
    pub job_id: Option<String>,
    pub match_method: Option<MatchMethod>,
    pub match_score: Option<f64>,
    pub confidence: Option<Confidence>,
    pub created_job: bool,
}

#[derive(Debug, Default, Serialize)]
pub struct ImportSummary {
    pub total: usize,
    pub linked: usize,
    pub created_jobs: usize,
    pub duplicates: usize,
    pub without_address: usize,
    pub submissions: Vec<ImportedSubmission>,
}

fn string_field<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|k| value.get(*k).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
}

/// Source id of a submission. Form exports often carry numeric ids.
fn source_id(value: &Value) -> Option<String> {
    ["id", "submission_id"]
        .iter()
        .filter_map(|k| match value.get(*k)? {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .find(|s| !s.is_empty())
}

/// Import submissions inside one transaction.
pub fn import_submissions(
    conn: &Connection,
    submissions: &[Value],
    options: MatchOptions,
) -> Result<ImportSummary> {
    let tx = conn.unchecked_transaction()?;
    let mut candidates: Vec<Candidate> =
        helpers::fetch_job_candidates(&tx).context("Failed to load jobs")?;

    let mut summary = ImportSummary {
        total: submissions.len(),
        ..Default::default()
    };

    for submission in submissions {
        let source_id = source_id(submission);
        if let Some(id) = source_id.as_deref() {
            if helpers::submission_exists(&tx, id)? {
                tracing::debug!(submission_id = id, "submission already imported");
                summary.duplicates += 1;
                continue;
            }
        }

        let address = string_field(submission, &["address", "job_address", "site_address"]);
        let submission_id =
            helpers::insert_submission(&tx, source_id.as_deref(), address, submission)?;

        let Some(address) = address else {
            summary.without_address += 1;
            summary.submissions.push(ImportedSubmission {
                submission_id,
                job_id: None,
                match_method: None,
                match_score: None,
                confidence: None,
                created_job: false,
            });
            continue;
        };

        let imported = match jobs::match_address_to_job(address, &candidates, Some(options)) {
            Some(m) => {
                helpers::link_submission_to_job(
                    &tx,
                    &submission_id,
                    &m.job_id,
                    m.match_score,
                    m.match_method,
                )?;
                summary.linked += 1;
                ImportedSubmission {
                    submission_id,
                    job_id: Some(m.job_id),
                    match_method: Some(m.match_method),
                    match_score: Some(m.match_score),
                    confidence: Some(m.confidence),
                    created_job: false,
                }
            }
            None => {
                let title = string_field(submission, &["job_name", "title"])
                    .map(String::from)
                    .unwrap_or_else(|| format!("Imported: {}", address));
                let job_id = helpers::insert_job(&tx, &title, Some(address))?;
                helpers::link_submission_to_job(
                    &tx,
                    &submission_id,
                    &job_id,
                    1.0,
                    MatchMethod::Exact,
                )?;
                candidates.push(Candidate::new(job_id.clone(), address));
                summary.created_jobs += 1;
                ImportedSubmission {
                    submission_id,
                    job_id: Some(job_id),
                    match_method: Some(MatchMethod::Exact),
                    match_score: Some(1.0),
                    confidence: Some(Confidence::High),
                    created_job: true,
                }
            }
        };
        summary.submissions.push(imported);
    }

    tx.commit()?;
    tracing::info!(
        total = summary.total,
        linked = summary.linked,
        created_jobs = summary.created_jobs,
        "imported submissions"
    );
    Ok(summary)
}

pub fn run(
    conn: &Connection,
    path: &Path,
    options: MatchOptions,
    output: &OutputControls,
) -> Result<()> {
    let submissions = load_submissions(path)?;
    let summary = import_submissions(conn, &submissions, options)?;

    if output.json {
        output.print(&summary);
    } else {
        println!("Imported {} submissions from {}", summary.total, path.display());
        println!("  linked to existing jobs: {}", summary.linked);
        println!("  new jobs created:        {}", summary.created_jobs);
        println!("  already imported:        {}", summary.duplicates);
        println!("  without address:         {}", summary.without_address);
    }
    Ok(())
}

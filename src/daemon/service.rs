//! Match service - dispatches daemon requests to the matching adapters.
//!
//! Holds one hot SQLite connection. Candidates are still fetched fresh for
//! every request so newly created jobs/customers are visible immediately.
//!
//! CHANGELOG:
//! - 10/16/2026 - Initial implementation

use rusqlite::Connection;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::adapters::{customers, jobs};
use crate::config::{MatchConfig, MatchMode};
use crate::db::{connection::open_db, helpers};
use crate::error::StoreError;
use crate::matching::{calculate_similarity, normalize_address, Candidate, MatchOptions};

type Params = HashMap<String, Value>;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// Protocol error code.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::UnknownMethod(_) => "UNKNOWN_METHOD",
            ServiceError::BadRequest(_) => "BAD_REQUEST",
            ServiceError::Store(_) => "STORE_ERROR",
        }
    }
}

/// Daemon service with a hot store connection.
pub struct MatchService {
    conn: Connection,
    config: MatchConfig,
    started_at: String,
}

impl MatchService {
    pub fn new(conn: Connection, config: MatchConfig) -> Self {
        Self {
            conn,
            config,
            started_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Open the store at `db_path` and make sure the schema exists.
    pub fn open(db_path: &Path, config: MatchConfig) -> Result<Self, StoreError> {
        let conn = open_db(db_path)?;
        helpers::init_schema(&conn)?;
        Ok(Self::new(conn, config))
    }

    pub fn dispatch(&self, method: &str, params: Params) -> Result<Value, ServiceError> {
        match method {
            "health" => self.health(),
            "normalize" => self.normalize(&params),
            "similarity" => self.similarity(&params),
            "match_job" => self.match_job(&params),
            "job_matches" => self.job_matches(&params),
            "match_customer" => self.match_customer(&params),
            "customer_matches" => self.customer_matches(&params),
            "batch_jobs" => self.batch_jobs(&params),
            "batch_customers" => self.batch_customers(&params),
            _ => Err(ServiceError::UnknownMethod(method.to_string())),
        }
    }

    // ========================================================================
    // Params
    // ========================================================================

    fn required_str<'a>(params: &'a Params, key: &str) -> Result<&'a str, ServiceError> {
        params
            .get(key)
            .and_then(Value::as_str)
            .ok_or_else(|| ServiceError::BadRequest(format!("missing string param '{}'", key)))
    }

    /// Start from the configured defaults and apply `min_score` /
    /// `exact_match_only` when present.
    fn options(params: &Params, defaults: MatchOptions) -> Result<MatchOptions, ServiceError> {
        let mut options = defaults;
        if let Some(v) = params.get("min_score") {
            let score = v
                .as_f64()
                .filter(|s| (0.0..=1.0).contains(s))
                .ok_or_else(|| {
                    ServiceError::BadRequest("min_score must be a number in [0, 1]".into())
                })?;
            options.min_score = score;
        }
        if let Some(v) = params.get("exact_match_only") {
            options.exact_match_only = v
                .as_bool()
                .ok_or_else(|| {
                    ServiceError::BadRequest("exact_match_only must be a boolean".into())
                })?;
        }
        Ok(options)
    }

    fn candidates_param(params: &Params, key: &str) -> Result<Vec<Candidate>, ServiceError> {
        let value = params
            .get(key)
            .cloned()
            .ok_or_else(|| ServiceError::BadRequest(format!("missing param '{}'", key)))?;
        serde_json::from_value(value).map_err(|e| {
            ServiceError::BadRequest(format!("'{}' must be a list of {{id, address}}: {}", key, e))
        })
    }

    // ========================================================================
    // Handlers
    // ========================================================================

    fn health(&self) -> Result<Value, ServiceError> {
        let jobs = helpers::fetch_job_candidates(&self.conn)?.len();
        let customers = helpers::fetch_customer_candidates(&self.conn)?.len();
        Ok(json!({
            "pid": std::process::id(),
            "started_at": self.started_at,
            "version": "v1",
            "job_candidates": jobs,
            "customer_candidates": customers,
        }))
    }

    fn normalize(&self, params: &Params) -> Result<Value, ServiceError> {
        let address = Self::required_str(params, "address")?;
        Ok(json!({
            "address": address,
            "normalized": normalize_address(address),
        }))
    }

    fn similarity(&self, params: &Params) -> Result<Value, ServiceError> {
        let a = normalize_address(Self::required_str(params, "a")?);
        let b = normalize_address(Self::required_str(params, "b")?);
        let score = calculate_similarity(&a, &b);
        Ok(json!({ "a": a, "b": b, "score": score }))
    }

    fn match_job(&self, params: &Params) -> Result<Value, ServiceError> {
        let address = Self::required_str(params, "address")?;
        let options = Self::options(params, self.config.job_options(MatchMode::Best))?;
        let candidates = helpers::fetch_job_candidates(&self.conn)?;
        let result = jobs::match_address_to_job(address, &candidates, Some(options));
        Ok(json!({ "address": address, "match": result }))
    }

    fn job_matches(&self, params: &Params) -> Result<Value, ServiceError> {
        let address = Self::required_str(params, "address")?;
        let options = Self::options(params, self.config.job_options(MatchMode::Review))?;
        let candidates = helpers::fetch_job_candidates(&self.conn)?;
        let results = jobs::find_all_matches(address, &candidates, Some(options));
        Ok(json!({ "address": address, "matches": results, "count": results.len() }))
    }

    fn match_customer(&self, params: &Params) -> Result<Value, ServiceError> {
        let address = Self::required_str(params, "address")?;
        let options = Self::options(params, self.config.customer_options(MatchMode::Best))?;
        match customers::resolve_job_customer(&self.conn, address, Some(options)) {
            customers::MatchOutcome::Found(m) => Ok(json!({ "address": address, "match": m })),
            customers::MatchOutcome::NoMatch => Ok(json!({ "address": address, "match": null })),
            customers::MatchOutcome::FetchError(e) => Err(e.into()),
        }
    }

    fn customer_matches(&self, params: &Params) -> Result<Value, ServiceError> {
        let address = Self::required_str(params, "address")?;
        let options = Self::options(params, self.config.customer_options(MatchMode::Review))?;
        let results = customers::find_all_customer_matches(&self.conn, address, Some(options));
        Ok(json!({ "address": address, "matches": results, "count": results.len() }))
    }

    /// Params: `addresses` (list of strings), optional `candidates`
    /// (list of `{id, address}`; defaults to the stored jobs).
    fn batch_jobs(&self, params: &Params) -> Result<Value, ServiceError> {
        let addresses: Vec<String> = params
            .get("addresses")
            .cloned()
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| {
                ServiceError::BadRequest(format!("'addresses' must be a list of strings: {}", e))
            })?
            .ok_or_else(|| ServiceError::BadRequest("missing param 'addresses'".into()))?;
        let options = Self::options(params, self.config.job_options(MatchMode::Best))?;

        let candidates = if params.contains_key("candidates") {
            Self::candidates_param(params, "candidates")?
        } else {
            helpers::fetch_job_candidates(&self.conn)?
        };

        let results = jobs::batch_match_addresses(&addresses, &candidates, Some(options));
        Ok(json!({ "results": results, "count": results.len() }))
    }

    /// Params: `jobs` (list of `{id, address}`).
    fn batch_customers(&self, params: &Params) -> Result<Value, ServiceError> {
        let jobs = Self::candidates_param(params, "jobs")?;
        let options = Self::options(params, self.config.customer_options(MatchMode::Best))?;
        let results = customers::batch_match_jobs_to_customers(&self.conn, &jobs, Some(options));
        Ok(json!({ "results": results, "count": results.len() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::helpers::{insert_customer, insert_job, test_conn};

    fn service() -> MatchService {
        let conn = test_conn();
        insert_job(&conn, "Roof", Some("123 Main Street Asheville NC")).unwrap();
        insert_job(&conn, "Deck", Some("456 Oak Ave")).unwrap();
        insert_customer(&conn, "Ada", Some("123 Main St, Asheville, North Carolina")).unwrap();
        MatchService::new(conn, MatchConfig::default())
    }

    fn params(value: Value) -> Params {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_health() {
        let svc = service();
        let result = svc.dispatch("health", Params::new()).unwrap();
        assert_eq!(result["job_candidates"], json!(2));
        assert_eq!(result["customer_candidates"], json!(1));
    }

    #[test]
    fn test_match_job() {
        let svc = service();
        let result = svc
            .dispatch("match_job", params(json!({"address": "123 Main St, Asheville, NC"})))
            .unwrap();
        assert_eq!(result["match"]["match_method"], json!("exact"));
        assert_eq!(result["match"]["confidence"], json!("high"));
    }

    #[test]
    fn test_match_customer_and_review_list() {
        let svc = service();
        let result = svc
            .dispatch("match_customer", params(json!({"address": "123 Main Street Asheville NC"})))
            .unwrap();
        assert_eq!(result["match"]["match_score"], json!(1.0));

        let result = svc
            .dispatch("customer_matches", params(json!({"address": "999 Far Away Rd"})))
            .unwrap();
        assert_eq!(result["count"], json!(0));
    }

    #[test]
    fn test_batch_jobs_with_inline_candidates() {
        let svc = service();
        let result = svc
            .dispatch(
                "batch_jobs",
                params(json!({
                    "addresses": ["9 Pine Rd", "10 Pine Rd"],
                    "candidates": [{"id": "x", "address": "9 Pine Road"}],
                })),
            )
            .unwrap();
        assert_eq!(result["results"]["9 Pine Rd"]["job_id"], json!("x"));
        assert_eq!(result["results"]["10 Pine Rd"], Value::Null);
    }

    #[test]
    fn test_batch_customers() {
        let svc = service();
        let result = svc
            .dispatch(
                "batch_customers",
                params(json!({"jobs": [{"id": "j1", "address": "123 Main St Asheville NC"}]})),
            )
            .unwrap();
        assert_eq!(result["count"], json!(1));
        assert!(result["results"]["j1"].is_object());
    }

    #[test]
    fn test_bad_requests() {
        let svc = service();
        let err = svc.dispatch("match_job", Params::new()).unwrap_err();
        assert_eq!(err.code(), "BAD_REQUEST");

        let err = svc
            .dispatch("match_job", params(json!({"address": "1 A St", "min_score": 2.0})))
            .unwrap_err();
        assert_eq!(err.code(), "BAD_REQUEST");

        let err = svc.dispatch("explode", Params::new()).unwrap_err();
        assert_eq!(err.code(), "UNKNOWN_METHOD");
    }

    #[test]
    fn test_store_failure_is_reported() {
        let svc = MatchService::new(Connection::open_in_memory().unwrap(), MatchConfig::default());
        let err = svc
            .dispatch("match_customer", params(json!({"address": "1 A St"})))
            .unwrap_err();
        assert_eq!(err.code(), "STORE_ERROR");
    }
}

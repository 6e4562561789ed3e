//! Value types shared by the match engine and the domain adapters.
//!
//! CHANGELOG:
//! - 10/16/2026 - Added MatchMethod parsing for stored links
//! - 10/16/2026 - Initial implementation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Score at or above which a fuzzy match is high confidence.
pub const HIGH_CONFIDENCE_SCORE: f64 = 0.95;

/// Score at or above which a fuzzy match is medium confidence.
pub const MEDIUM_CONFIDENCE_SCORE: f64 = 0.85;

/// Something an address can be matched against (a job, a customer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub address: String,
}

impl Candidate {
    pub fn new(id: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            address: address.into(),
        }
    }
}

/// How a match was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMethod {
    /// Normalized addresses are identical.
    Exact,
    /// Edit-distance similarity cleared the threshold.
    Fuzzy,
    /// Linked by a person from the review list.
    Manual,
}

impl MatchMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMethod::Exact => "exact",
            MatchMethod::Fuzzy => "fuzzy",
            MatchMethod::Manual => "manual",
        }
    }
}

impl fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for MatchMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" => Ok(MatchMethod::Exact),
            "fuzzy" => Ok(MatchMethod::Fuzzy),
            "manual" => Ok(MatchMethod::Manual),
            other => Err(format!("unknown match method: {}", other)),
        }
    }
}

/// Confidence tier derived from the similarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Tier a score: `>= 0.95` high, `>= 0.85` medium, anything else low.
    pub fn from_score(score: f64) -> Self {
        if score >= HIGH_CONFIDENCE_SCORE {
            Confidence::High
        } else if score >= MEDIUM_CONFIDENCE_SCORE {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Per-call matching configuration.
///
/// There is no global default: each adapter documents its own thresholds
/// and builds the options it passes to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchOptions {
    /// Minimum similarity (inclusive) for a fuzzy match to be kept.
    pub min_score: f64,
    /// Skip the fuzzy pass entirely.
    #[serde(default)]
    pub exact_match_only: bool,
}

impl MatchOptions {
    pub fn new(min_score: f64) -> Self {
        Self {
            min_score,
            exact_match_only: false,
        }
    }

    pub fn exact_only(mut self, exact_match_only: bool) -> Self {
        self.exact_match_only = exact_match_only;
        self
    }
}

/// One scored candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub candidate_id: String,
    pub candidate_address: String,
    pub score: f64,
    pub method: MatchMethod,
    pub confidence: Confidence,
}

impl MatchResult {
    pub(crate) fn exact(candidate: &Candidate) -> Self {
        Self {
            candidate_id: candidate.id.clone(),
            candidate_address: candidate.address.clone(),
            score: 1.0,
            method: MatchMethod::Exact,
            confidence: Confidence::High,
        }
    }

    pub(crate) fn scored(candidate: &Candidate, score: f64, method: MatchMethod) -> Self {
        Self {
            candidate_id: candidate.id.clone(),
            candidate_address: candidate.address.clone(),
            score,
            method,
            confidence: Confidence::from_score(score),
        }
    }
}

//! Edit-distance similarity between normalized addresses.
//!
//! CHANGELOG:
//! - 10/16/2026 - Initial implementation

use strsim::levenshtein;

/// Similarity in `[0.0, 1.0]`: `1 - levenshtein(a, b) / max(len(a), len(b))`.
///
/// Lengths are counted in chars, the same unit the distance uses. The
/// thresholds in the adapters are calibrated against this exact ratio, so
/// do not swap in Dice/Jaro or a sum-of-lengths denominator.
pub fn calculate_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let max_len = a.chars().count().max(b.chars().count());
    let distance = levenshtein(a, b);
    1.0 - (distance as f64 / max_len as f64)
}

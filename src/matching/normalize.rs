//! Address normalization.
//!
//! Turns free-text postal addresses into a canonical lowercase form so that
//! "123 Main Street, Asheville, North Carolina" and "123 main st asheville nc"
//! compare equal.
//!
//! CHANGELOG:
//! - 10/16/2026 - Country suffix anchored at the raw end of input
//! - 10/16/2026 - Repeat the pipeline until stable (idempotence)
//! - 10/16/2026 - Initial implementation

use regex::{Captures, Regex};
use std::sync::LazyLock;

static LEADING_DETERMINER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:the|a|an)\s+").unwrap());

static COUNTRY_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*(?:usa|united states|us)$").unwrap());

// Only North Carolina is folded; every customer address so far is in-state.
static NC_STATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:,\s*)?\b(?:north carolina|nc)\b").unwrap());

static STREET_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(street|avenue|boulevard|road|drive|lane|court|circle|place|parkway|terrace|highway)\b",
    )
    .unwrap()
});

/// Whole-word street suffix abbreviations.
const STREET_SUFFIXES: &[(&str, &str)] = &[
    ("street", "st"),
    ("avenue", "ave"),
    ("boulevard", "blvd"),
    ("road", "rd"),
    ("drive", "dr"),
    ("lane", "ln"),
    ("court", "ct"),
    ("circle", "cir"),
    ("place", "pl"),
    ("parkway", "pkwy"),
    ("terrace", "ter"),
    ("highway", "hwy"),
];

/// Normalize an address for comparison.
///
/// Empty input gives an empty string. The output is lowercase, has no
/// `.`, `,` or `#`, and is single-spaced with no leading/trailing space.
/// `normalize_address(&normalize_address(x)) == normalize_address(x)`.
pub fn normalize_address(address: &str) -> String {
    let mut current = normalize_pass(address);

    // A second pass can only shorten the string (e.g. a determiner exposed
    // once leading punctuation is gone), so this terminates.
    loop {
        let next = normalize_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn normalize_pass(address: &str) -> String {
    let lowered = address.to_lowercase();

    let stripped = LEADING_DETERMINER.replace(&lowered, "");
    let stripped = COUNTRY_SUFFIX.replace(&stripped, "");

    let folded = NC_STATE.replace_all(&stripped, ", nc ");
    let folded = STREET_SUFFIX.replace_all(&folded, |caps: &Captures| {
        abbreviate_suffix(&caps[1]).to_string()
    });

    let spaced: String = folded
        .chars()
        .map(|c| match c {
            '.' | ',' | '#' => ' ',
            other => other,
        })
        .collect();

    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn abbreviate_suffix(word: &str) -> &str {
    STREET_SUFFIXES
        .iter()
        .find(|(long, _)| *long == word)
        .map(|(_, short)| *short)
        .unwrap_or(word)
}

/// Leading street number of a normalized address, if any.
pub fn street_number(normalized: &str) -> Option<&str> {
    let end = normalized
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(normalized.len());

    if end == 0 {
        None
    } else {
        Some(&normalized[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_pipeline() {
        assert_eq!(
            normalize_address("123 Main Street, Asheville, North Carolina"),
            "123 main st asheville nc"
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize_address(""), "");
        assert_eq!(normalize_address("   "), "");
        assert_eq!(normalize_address(" ,.# "), "");
    }

    #[test]
    fn test_abbreviated_state_matches_spelled_out() {
        assert_eq!(
            normalize_address("123 Main St, Asheville, NC"),
            normalize_address("123 Main Street Asheville North Carolina")
        );
    }

    #[test]
    fn test_country_suffix_stripped() {
        assert_eq!(normalize_address("10 Oak Ln, Boone, NC, USA"), "10 oak ln boone nc");
        assert_eq!(normalize_address("10 Oak Ln, United States"), "10 oak ln");
        assert_eq!(normalize_address("10 Oak Ln,us"), "10 oak ln");
        // Only as a trailing suffix
        assert_eq!(normalize_address("10 Usa Ln"), "10 usa ln");
        // Anchored at the raw end of input, before whitespace is collapsed
        assert_eq!(
            normalize_address("123 Main St, Asheville, NC, USA "),
            "123 main st asheville nc usa"
        );
    }

    #[test]
    fn test_leading_determiner_stripped() {
        assert_eq!(normalize_address("The Highlands Road"), "highlands rd");
        assert_eq!(normalize_address("An Old Mill Lane"), "old mill ln");
        assert_eq!(normalize_address("Theater Row"), "theater row");
    }

    #[test]
    fn test_suffixes_fold_whole_words_only() {
        assert_eq!(normalize_address("5 Streetlight Avenue"), "5 streetlight ave");
        assert_eq!(normalize_address("9 Drivers Court"), "9 drivers ct");
        assert_eq!(
            normalize_address("1 Blue Ridge Parkway Highway Terrace Circle Place Boulevard"),
            "1 blue ridge pkwy hwy ter cir pl blvd"
        );
    }

    #[test]
    fn test_punctuation_becomes_space() {
        assert_eq!(normalize_address("123 Main St., Apt #4"), "123 main st apt 4");
        // Replacing rather than deleting keeps tokens apart
        assert_eq!(normalize_address("12.B Elm"), "12 b elm");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "123 Main Street, Asheville, North Carolina",
            ". the 5 main street",
            "The the Lane",
            "north. carolina",
            "  42   Broad   St ,  Brevard ,NC 28712 ",
            "#7 Court House Dr, NC, USA",
            "",
        ];
        for input in inputs {
            let once = normalize_address(input);
            assert_eq!(normalize_address(&once), once, "input: {:?}", input);
        }
        assert_eq!(normalize_address(". the 5 main street"), "5 main st");
        assert_eq!(normalize_address("  The Old Mill Lane"), "old mill ln");
    }

    #[test]
    fn test_street_number() {
        assert_eq!(street_number("123 main st"), Some("123"));
        assert_eq!(street_number("123b main st"), Some("123"));
        assert_eq!(street_number("main st"), None);
        assert_eq!(street_number(""), None);
    }
}

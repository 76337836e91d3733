//! Task-name filter validation with "did you mean" suggestions.
//!
//! The score mirrors a weighted fuzzy ratio: the better of the plain
//! normalized Levenshtein similarity and a 0.9-weighted best-window
//! similarity, so that a short query matching part of a long name still
//! scores well. Comparison is case-insensitive.
use strsim::normalized_levenshtein;

use crate::error::SuiteError;
use crate::task::TaskRegistry;

/// Minimum score (0..=100) for a suggestion to be offered.
pub const SUGGESTION_THRESHOLD: u32 = 80;

const PARTIAL_WEIGHT: f64 = 0.9;

pub fn fuzzy_score(query: &str, candidate: &str) -> u32 {
    let a = query.to_lowercase();
    let b = candidate.to_lowercase();
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let full = normalized_levenshtein(&a, &b);
    let (short, long) = if a.chars().count() <= b.chars().count() {
        (a.as_str(), b.as_str())
    } else {
        (b.as_str(), a.as_str())
    };
    let partial = if short.chars().count() == long.chars().count() {
        full
    } else {
        best_window(short, long) * PARTIAL_WEIGHT
    };

    (full.max(partial) * 100.0).round() as u32
}

/// Best similarity between `short` and any window of `long` with the same
/// character length.
fn best_window(short: &str, long: &str) -> f64 {
    let width = short.chars().count();
    let chars: Vec<char> = long.chars().collect();
    chars
        .windows(width)
        .map(|w| normalized_levenshtein(short, &w.iter().collect::<String>()))
        .fold(0.0, f64::max)
}

/// Closest candidate scoring at least [`SUGGESTION_THRESHOLD`]. Ties keep the
/// first candidate in iteration order.
pub fn suggest_keyword<'a, I>(typo: &str, candidates: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(&str, u32)> = None;
    for candidate in candidates {
        let score = fuzzy_score(typo, candidate);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((candidate, score));
        }
    }
    best.filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
        .map(|(name, _)| name.to_string())
}

/// Every requested name must exist in `registry`; the first unknown one is
/// reported with the closest registered name, if any is close enough.
pub fn validate_filter(registry: &TaskRegistry, tasks: &[String]) -> Result<(), SuiteError> {
    for name in tasks {
        if !registry.contains(name) {
            return Err(SuiteError::UnknownTask {
                name: name.clone(),
                suggestion: suggest_keyword(name, registry.names()),
            });
        }
    }
    Ok(())
}

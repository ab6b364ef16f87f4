//! Input validation run above the store boundary.
//!
//! The stores accept whatever they are given; these checks are what keeps
//! blank names out of the catalog. Also hosts the edit-distance helper
//! used for "did you mean" suggestions on category names.

use crate::error::{Error, Result};

/// Require a non-blank value, returning it trimmed.
///
/// # Errors
///
/// Returns [`Error::RequiredField`] if `value` is empty or whitespace.
pub fn require_name<'a>(field: &'static str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::RequiredField { field });
    }
    Ok(trimmed)
}

/// Collapse a blank description to `None`, trimming otherwise.
#[must_use]
pub fn normalize_description(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|d| !d.is_empty())
}

// ── Levenshtein distance ─────────────────────────────────────

/// Compute the Levenshtein edit distance between two strings.
#[must_use]
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1)
                .min(curr[j] + 1)
                .min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Names from `existing` within edit distance 3 of `searched`.
///
/// Comparison ignores ASCII case. Returns up to `max` names sorted by
/// distance, then alphabetically.
#[must_use]
pub fn find_similar_names(searched: &str, existing: &[String], max: usize) -> Vec<String> {
    let searched = searched.to_ascii_lowercase();
    let mut candidates: Vec<(usize, &str)> = existing
        .iter()
        .map(|name| (levenshtein_distance(&searched, &name.to_ascii_lowercase()), name.as_str()))
        .filter(|(dist, _)| *dist <= 3)
        .collect();

    candidates.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));

    candidates
        .into_iter()
        .take(max)
        .map(|(_, name)| name.to_string())
        .collect()
}

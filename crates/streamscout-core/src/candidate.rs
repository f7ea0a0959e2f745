//! Candidate hostname normalization and extraction
//!
//! Every source hands back raw strings; they all pass through
//! [`normalize_host`] before they reach the validator.

use std::collections::BTreeSet;

use regex::Regex;

use crate::error::{Result, ScoutError};

/// Normalizes a raw candidate into a bare lowercase host
///
/// Strips surrounding whitespace, a `scheme://` prefix, any path, leading
/// wildcard markers (`*` and `.`) and trailing dots. Returns `None` when
/// nothing usable is left or the entry contains inner whitespace.
///
/// Normalizing an already-normalized host returns it unchanged.
///
/// # Example
/// ```
/// use streamscout_core::normalize_host;
/// assert_eq!(normalize_host("*.Example.SBS"), Some("example.sbs".to_string()));
/// assert_eq!(normalize_host("https://a.example/x.m3u8"), Some("a.example".to_string()));
/// assert_eq!(normalize_host("  "), None);
/// ```
pub fn normalize_host(raw: &str) -> Option<String> {
    let lowered = raw.trim().to_ascii_lowercase();

    let without_scheme = match lowered.split_once("://") {
        Some((_, rest)) => rest,
        None => lowered.as_str(),
    };
    let host = without_scheme.split('/').next().unwrap_or(without_scheme);
    let host = host
        .trim_start_matches(['*', '.'])
        .trim_end_matches('.');

    if host.is_empty() || host.chars().any(char::is_whitespace) {
        return None;
    }

    Some(host.to_string())
}

/// Normalizes and deduplicates candidates into a sorted sequence
pub fn normalize_candidates<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .filter_map(|c| normalize_host(c.as_ref()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Compiles the pattern that picks hostnames containing `keyword` out of text
///
/// Matches the keyword with an optional alphanumeric tail (so `zirvedesin24`
/// matches), any number of leading labels, and a TLD.
pub fn host_pattern(keyword: &str) -> Result<Regex> {
    let pattern = format!(
        r"(?i)(?:[a-z0-9-]+\.)*[a-z0-9-]*{}[a-z0-9-]*\.[a-z]{{2,}}",
        regex::escape(keyword)
    );
    Regex::new(&pattern)
        .map_err(|e| ScoutError::ParseError(format!("Invalid host pattern: {}", e)))
}

/// Extracts every normalized host matching `pattern` from raw text
pub fn extract_hosts(pattern: &Regex, text: &str) -> BTreeSet<String> {
    pattern
        .find_iter(text)
        .filter_map(|m| normalize_host(m.as_str()))
        .collect()
}

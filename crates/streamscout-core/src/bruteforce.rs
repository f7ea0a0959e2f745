//! Last-resort candidate generator
//!
//! Enumerates hostnames that follow the naming convention of the target
//! domain family. No I/O.

use crate::config::BruteForceConfig;

/// Generates `<prefix>.<stem><number>.<tld>` for every combination
///
/// Output order is prefix-major, then number, then TLD, and is the same on
/// every call with the same configuration.
///
/// # Example
/// ```
/// use streamscout_core::{generate_bruteforce_candidates, BruteForceConfig};
/// let config = BruteForceConfig {
///     stem: "zirvedesin".to_string(),
///     prefixes: vec!["kodiaq".to_string()],
///     numbers: 24..=24,
///     tlds: vec!["sbs".to_string()],
/// };
/// assert_eq!(generate_bruteforce_candidates(&config), vec!["kodiaq.zirvedesin24.sbs"]);
/// ```
pub fn generate_bruteforce_candidates(config: &BruteForceConfig) -> Vec<String> {
    let mut hosts = Vec::with_capacity(expected_len(config));
    for prefix in &config.prefixes {
        for number in config.numbers.clone() {
            for tld in &config.tlds {
                hosts.push(format!("{}.{}{}.{}", prefix, config.stem, number, tld));
            }
        }
    }
    hosts
}

fn expected_len(config: &BruteForceConfig) -> usize {
    let numbers = config.numbers.clone().count();
    config.prefixes.len() * numbers * config.tlds.len()
}

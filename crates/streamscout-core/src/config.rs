//! Discovery configuration
//!
//! Everything the pipeline can be tuned with is passed in through these
//! structures at construction time.

use std::fmt;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::str::FromStr;

use crate::client::ClientConfig;
use crate::error::{Result, ScoutError};
use crate::playlist::{PlaylistConfig, default_channels};

/// When the brute-force generator contributes candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BruteForcePolicy {
    /// Only when every earlier stage produced nothing
    #[default]
    WhenEmpty,
    /// Every run
    Always,
    /// Never
    Never,
}

impl BruteForcePolicy {
    /// Whether brute force runs given the size of the pool so far
    pub fn should_run(self, pool_size: usize) -> bool {
        match self {
            BruteForcePolicy::WhenEmpty => pool_size == 0,
            BruteForcePolicy::Always => true,
            BruteForcePolicy::Never => false,
        }
    }
}

impl FromStr for BruteForcePolicy {
    type Err = ScoutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "when-empty" | "when_empty" | "empty" => Ok(BruteForcePolicy::WhenEmpty),
            "always" => Ok(BruteForcePolicy::Always),
            "never" => Ok(BruteForcePolicy::Never),
            other => Err(ScoutError::InvalidConfig(format!(
                "unknown brute force policy '{}' (expected when-empty, always or never)",
                other
            ))),
        }
    }
}

impl fmt::Display for BruteForcePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BruteForcePolicy::WhenEmpty => "when-empty",
            BruteForcePolicy::Always => "always",
            BruteForcePolicy::Never => "never",
        };
        f.write_str(name)
    }
}

/// Static parameter lists for the brute-force generator
///
/// Hosts follow `<prefix>.<stem><number>.<tld>`.
#[derive(Debug, Clone)]
pub struct BruteForceConfig {
    pub stem: String,
    pub prefixes: Vec<String>,
    pub numbers: RangeInclusive<u32>,
    pub tlds: Vec<String>,
}

impl Default for BruteForceConfig {
    fn default() -> Self {
        Self {
            stem: "zirvedesin".to_string(),
            prefixes: ["kodiaq", "grizzly", "panda", "koala", "polar", "sloth", "baribal", "kermode"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            numbers: 1..=60,
            tlds: ["sbs", "xyz", "fun", "live", "site"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Third-party endpoints consulted by the source queriers
#[derive(Debug, Clone)]
pub struct SourceEndpoints {
    /// crt.sh base URL
    pub crtsh: String,
    /// certspotter API base URL
    pub certspotter: String,
    /// Apex domain queried on certspotter
    pub certspotter_domain: String,
    /// RapidDNS base URL
    pub rapiddns: String,
    /// Numbered target page template, `{n}` is replaced by the page number
    pub target_page_template: String,
    /// Page numbers scanned on the target site
    pub page_range: RangeInclusive<u32>,
    /// Upper bound on pages scanned per pass
    pub max_pages: usize,
}

impl Default for SourceEndpoints {
    fn default() -> Self {
        Self {
            crtsh: "https://crt.sh".to_string(),
            certspotter: "https://api.certspotter.com".to_string(),
            certspotter_domain: "zirvedesin.sbs".to_string(),
            rapiddns: "https://rapiddns.io".to_string(),
            target_page_template: "https://dengetv{n}.live/".to_string(),
            page_range: 67..=200,
            max_pages: 30,
        }
    }
}

/// Configuration for the discovery orchestrator
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    pub cache_path: PathBuf,
    /// Optional operator-supplied hosts, one per line
    pub manual_domains_path: PathBuf,
    pub cache_ttl_seconds: u64,
    /// Shorter TTL for a cached fallback that was written with no candidates
    pub fallback_retry_seconds: u64,
    /// Admission limit shared by all validation probes
    pub concurrency_limit: usize,
    pub brute_force_policy: BruteForcePolicy,
    pub brute_force: BruteForceConfig,
    /// Substring every discovered host must contain
    pub domain_keyword: String,
    pub endpoints: SourceEndpoints,
    /// Repeat the target page scan through a headless browser when available
    pub render_pages: bool,
    /// Paths tried in order on each candidate; any one answering validates it
    pub validation_paths: Vec<String>,
    /// Schemes tried in order for each candidate
    pub probe_schemes: Vec<String>,
    pub fallback_url: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            cache_path: PathBuf::from(".domain_cache.json"),
            manual_domains_path: PathBuf::from("manual_domains.txt"),
            cache_ttl_seconds: 6 * 60 * 60,
            fallback_retry_seconds: 5 * 60,
            concurrency_limit: 50,
            brute_force_policy: BruteForcePolicy::default(),
            brute_force: BruteForceConfig::default(),
            domain_keyword: "zirvedesin".to_string(),
            endpoints: SourceEndpoints::default(),
            render_pages: true,
            validation_paths: default_validation_paths(),
            probe_schemes: vec!["https".to_string(), "http".to_string()],
            fallback_url: "https://kodiaq.zirvedesin24.sbs/".to_string(),
        }
    }
}

impl DiscoveryConfig {
    /// Reject configurations the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.concurrency_limit == 0 {
            return Err(ScoutError::InvalidConfig(
                "concurrency_limit must be positive".to_string(),
            ));
        }
        if self.endpoints.page_range.is_empty() {
            return Err(ScoutError::InvalidConfig(format!(
                "page range {:?} is empty",
                self.endpoints.page_range
            )));
        }
        if !self.endpoints.target_page_template.contains("{n}") {
            return Err(ScoutError::InvalidConfig(
                "target page template must contain {n}".to_string(),
            ));
        }
        if self.validation_paths.is_empty() {
            return Err(ScoutError::InvalidConfig(
                "at least one validation path is required".to_string(),
            ));
        }
        if let Some(bad) = self.validation_paths.iter().find(|p| !p.starts_with('/')) {
            return Err(ScoutError::InvalidConfig(format!(
                "validation path {bad:?} must start with '/'"
            )));
        }
        if self.probe_schemes.is_empty() {
            return Err(ScoutError::InvalidConfig(
                "at least one probe scheme is required".to_string(),
            ));
        }
        if self.domain_keyword.trim().is_empty() {
            return Err(ScoutError::InvalidConfig(
                "domain keyword cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Known stream paths, then the first few channel files
///
/// `/yayinzirve.m3u8` always comes first. Duplicates are dropped.
pub fn default_validation_paths() -> Vec<String> {
    let known = ["/yayinzirve.m3u8", "/yayin1.m3u8", "/index.m3u8", "/playlist.m3u8"]
        .into_iter()
        .map(str::to_string);
    let channels = default_channels()
        .into_values()
        .take(4)
        .map(|file| format!("/{file}"));

    let mut paths: Vec<String> = Vec::new();
    for path in known.chain(channels) {
        if !paths.contains(&path) {
            paths.push(path);
        }
    }
    paths
}

/// Full configuration for one pipeline run
#[derive(Debug, Clone, Default)]
pub struct ScoutConfig {
    pub client: ClientConfig,
    pub discovery: DiscoveryConfig,
    pub playlist: PlaylistConfig,
}

//! Discovery orchestrator
//!
//! Stages run in a fixed order and each one is best-effort:
//! cache, manual list, sources, brute force, normalize, validate, resolve.
//! The orchestrator always produces a URL; when nothing validates it falls
//! back to a fixed default.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::bruteforce::generate_bruteforce_candidates;
use crate::cache::{CacheRecord, CacheStore};
use crate::candidate::normalize_candidates;
use crate::client::ScoutClient;
use crate::config::DiscoveryConfig;
use crate::error::Result;
use crate::fetcher::{PageFetcher, StaticFetcher, rendered_fetcher};
use crate::sources::{
    CandidateSource, CertSpotterSource, CrtShSource, RapidDnsSource, TargetPageSource,
    collect_candidates, load_manual_domains,
};
use crate::validator::Validator;

/// Where the returned base URL came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Cache,
    Validated,
    Fallback,
}

/// Result of one discovery run
#[derive(Debug, Clone, PartialEq)]
pub struct Discovery {
    pub base_url: String,
    /// Winning host, set only for [`Origin::Validated`]
    pub host: Option<String>,
    pub origin: Origin,
    /// Normalized candidates considered (empty on a cache hit)
    pub candidates: Vec<String>,
}

/// Runs the discovery stages against a configuration
pub struct Discoverer {
    config: DiscoveryConfig,
    cache: CacheStore,
    sources: Vec<Box<dyn CandidateSource>>,
    validator: Validator,
}

impl Discoverer {
    /// Create a discoverer wired to the four standard sources
    ///
    /// # Arguments
    /// * `config` - Discovery settings, checked with [`DiscoveryConfig::validate`]
    /// * `client` - Shared HTTP client for sources and probes
    ///
    /// # Errors
    /// - `InvalidConfig` - The configuration was rejected
    /// - `ParseError` - The keyword did not produce a usable host pattern
    pub fn new(config: DiscoveryConfig, client: ScoutClient) -> Result<Self> {
        let sources = default_sources(&config, &client)?;
        Self::with_sources(config, client, sources)
    }

    /// Create a discoverer with an explicit source list
    ///
    /// # Errors
    /// - `InvalidConfig` - The configuration was rejected
    pub fn with_sources(
        config: DiscoveryConfig,
        client: ScoutClient,
        sources: Vec<Box<dyn CandidateSource>>,
    ) -> Result<Self> {
        config.validate()?;

        let validator = Validator::new(
            client,
            config.concurrency_limit,
            config.validation_paths.clone(),
            config.probe_schemes.clone(),
        );

        Ok(Self {
            cache: CacheStore::new(config.cache_path.clone()),
            config,
            sources,
            validator,
        })
    }

    /// Discover the base stream URL
    pub async fn discover_base(&self) -> String {
        self.discover().await.base_url
    }

    /// Run every stage and report how the URL was obtained
    ///
    /// # Returns
    /// Always a [`Discovery`]: a fresh cached URL, the first validated
    /// candidate, or the configured fallback. The cache file is rewritten
    /// unless the cached URL was used.
    pub async fn discover(&self) -> Discovery {
        let now = now_ts();
        let cached = self.cache.load().await;

        if let Some(url) = cached.fresh_url(now, self.effective_ttl(&cached)) {
            info!(url, age = cached.age(now) as u64, "using cached base URL");
            return Discovery {
                base_url: url.to_string(),
                host: None,
                origin: Origin::Cache,
                candidates: Vec::new(),
            };
        }

        let mut pool: BTreeSet<String> = load_manual_domains(&self.config.manual_domains_path)
            .await
            .into_iter()
            .collect();

        pool.extend(collect_candidates(&self.sources).await);
        info!(count = pool.len(), "candidates from manual list and sources");

        if self.config.brute_force_policy.should_run(pool.len()) {
            let generated = generate_bruteforce_candidates(&self.config.brute_force);
            info!(count = generated.len(), policy = %self.config.brute_force_policy, "adding brute force candidates");
            pool.extend(generated);
        }

        let candidates = normalize_candidates(&pool);
        info!(count = candidates.len(), "candidates to validate");

        match self.validator.first_valid(&candidates).await {
            Some(winner) => {
                self.persist(&winner.base_url, now, &candidates).await;
                info!(url = %winner.base_url, "discovered base URL");
                Discovery {
                    base_url: winner.base_url,
                    host: Some(winner.host),
                    origin: Origin::Validated,
                    candidates,
                }
            }
            None => {
                let fallback = self.config.fallback_url.clone();
                self.persist(&fallback, now, &candidates).await;
                warn!(url = %fallback, "no candidate validated, using fallback");
                Discovery {
                    base_url: fallback,
                    host: None,
                    origin: Origin::Fallback,
                    candidates,
                }
            }
        }
    }

    /// TTL for a cached record
    ///
    /// A cached fallback written with no candidates expires after the
    /// shorter retry window.
    fn effective_ttl(&self, record: &CacheRecord) -> u64 {
        let is_bare_fallback = record.base_stream_url.as_deref()
            == Some(self.config.fallback_url.as_str())
            && record.candidates.is_empty();

        if is_bare_fallback {
            self.config
                .cache_ttl_seconds
                .min(self.config.fallback_retry_seconds)
        } else {
            self.config.cache_ttl_seconds
        }
    }

    async fn persist(&self, base_url: &str, now: f64, candidates: &[String]) {
        let record = CacheRecord {
            base_stream_url: Some(base_url.to_string()),
            base_ts: now,
            candidates: candidates.to_vec(),
        };
        self.cache.save(&record).await;
        debug!(path = %self.cache.path().display(), url = base_url, "cache updated");
    }
}

/// The four standard sources, built from configuration
pub fn default_sources(
    config: &DiscoveryConfig,
    client: &ScoutClient,
) -> Result<Vec<Box<dyn CandidateSource>>> {
    let endpoints = &config.endpoints;
    let static_fetcher: Arc<dyn PageFetcher> = Arc::new(StaticFetcher::new(client.clone()));
    let renderer = if config.render_pages {
        rendered_fetcher()
    } else {
        None
    };

    Ok(vec![
        Box::new(CrtShSource::new(
            client.clone(),
            endpoints.crtsh.clone(),
            config.domain_keyword.clone(),
        )),
        Box::new(CertSpotterSource::new(
            client.clone(),
            endpoints.certspotter.clone(),
            endpoints.certspotter_domain.clone(),
        )),
        Box::new(RapidDnsSource::new(
            client.clone(),
            endpoints.rapiddns.clone(),
            config.domain_keyword.clone(),
        )?),
        Box::new(
            TargetPageSource::new(
                static_fetcher,
                endpoints.target_page_template.clone(),
                endpoints.page_range.clone(),
                endpoints.max_pages,
                &config.domain_keyword,
            )?
            .with_renderer(renderer),
        ),
    ])
}

/// Current time in epoch seconds
fn now_ts() -> f64 {
    Utc::now().timestamp_millis() as f64 / 1000.0
}

//! Concurrent reachability validation
//!
//! Probes every candidate under a shared admission limit and stops at the
//! first host that answers. Remaining probes are aborted; a probe already
//! mid-request is dropped at its next await point.

use std::sync::Arc;

use reqwest::Method;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::client::ScoutClient;
use crate::url::{build_base_url, build_probe_url};

/// Markers that make a probe body look like a playlist
const PLAYLIST_MARKERS: &[&str] = &["#EXTM3U", "#EXTINF", ".m3u8"];

/// Statuses that count as a live stream path
const ACCEPTED_STATUSES: &[u16] = &[200, 206];

/// A candidate that answered its validation probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedHost {
    /// The candidate exactly as it was given to the validator
    pub host: String,
    /// `<scheme>://<host>/`
    pub base_url: String,
}

/// Races validation probes across a candidate list
#[derive(Clone)]
pub struct Validator {
    client: ScoutClient,
    concurrency_limit: usize,
    paths: Arc<[String]>,
    schemes: Arc<[String]>,
}

impl Validator {
    /// Create a validator
    ///
    /// # Arguments
    /// * `client` - Client used for every probe
    /// * `concurrency_limit` - Probes in flight at once, raised to 1 if zero
    /// * `paths` - Paths tried in order on each host
    /// * `schemes` - Schemes tried in order, each over every path
    pub fn new(
        client: ScoutClient,
        concurrency_limit: usize,
        paths: Vec<String>,
        schemes: Vec<String>,
    ) -> Self {
        Self {
            client,
            concurrency_limit: concurrency_limit.max(1),
            paths: Arc::from(paths),
            schemes: Arc::from(schemes),
        }
    }

    /// Return the first candidate whose probe succeeds
    ///
    /// # Arguments
    /// * `candidates` - Hosts to race, optionally with a port
    ///
    /// # Returns
    /// The first host to answer with an accepted status, or `None` when the
    /// list is empty or nothing answers. Per-candidate failures only
    /// disqualify that candidate.
    pub async fn first_valid(&self, candidates: &[String]) -> Option<ValidatedHost> {
        if candidates.is_empty() {
            return None;
        }

        let gate = Arc::new(Semaphore::new(self.concurrency_limit));
        let mut probes = JoinSet::new();

        for host in candidates {
            let gate = Arc::clone(&gate);
            let client = self.client.clone();
            let paths = Arc::clone(&self.paths);
            let schemes = Arc::clone(&self.schemes);
            let host = host.clone();

            probes.spawn(async move {
                let _permit = gate.acquire_owned().await.ok()?;
                probe_host(&client, &host, &schemes, &paths).await
            });
        }

        info!(
            candidates = candidates.len(),
            limit = self.concurrency_limit,
            "validating candidates"
        );

        while let Some(joined) = probes.join_next().await {
            match joined {
                Ok(Some(winner)) => {
                    probes.abort_all();
                    info!(host = %winner.host, base_url = %winner.base_url, "candidate validated");
                    return Some(winner);
                }
                Ok(None) => {}
                Err(e) if e.is_cancelled() => {}
                Err(e) => debug!(error = %e, "probe task failed"),
            }
        }

        None
    }
}

/// Probe one host under each scheme and path in order
async fn probe_host(
    client: &ScoutClient,
    host: &str,
    schemes: &[String],
    paths: &[String],
) -> Option<ValidatedHost> {
    for scheme in schemes {
        for path in paths {
            let url = build_probe_url(scheme, host, path);
            if path_answers(client, &url).await {
                return Some(ValidatedHost {
                    host: host.to_string(),
                    base_url: build_base_url(scheme, host),
                });
            }
        }
    }
    None
}

/// HEAD first, then GET when HEAD is refused or fails
async fn path_answers(client: &ScoutClient, url: &str) -> bool {
    match client.probe(Method::HEAD, url).await {
        Ok(response) if ACCEPTED_STATUSES.contains(&response.status) => {
            debug!(url = %url, status = response.status, "HEAD accepted");
            return true;
        }
        Ok(response) => debug!(url = %url, status = response.status, "HEAD rejected"),
        Err(e) => debug!(url = %url, error = %e, "HEAD failed"),
    }

    match client.probe(Method::GET, url).await {
        Ok(response) if ACCEPTED_STATUSES.contains(&response.status) => {
            if PLAYLIST_MARKERS.iter().any(|m| response.body.contains(m)) {
                debug!(url = %url, "playlist content confirmed");
            } else {
                debug!(url = %url, status = response.status, "accepted without playlist markers");
            }
            true
        }
        Ok(response) => {
            debug!(url = %url, status = response.status, "probe rejected");
            false
        }
        Err(e) => {
            debug!(url = %url, error = %e, "probe failed");
            false
        }
    }
}

//! Candidate sources
//!
//! Each source is an independent lookup against one third-party service.
//! Sources may fail; [`collect_candidates`] runs them all to completion and
//! turns any failure into an empty contribution.

use std::collections::BTreeSet;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{info, warn};

use crate::error::Result;

pub mod certspotter;
pub mod crtsh;
pub mod manual;
pub mod rapiddns;
pub mod target_pages;

pub use certspotter::CertSpotterSource;
pub use crtsh::CrtShSource;
pub use manual::load_manual_domains;
pub use rapiddns::RapidDnsSource;
pub use target_pages::TargetPageSource;

/// A lookup contributing candidate hostnames
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Short label used in logs
    fn name(&self) -> &'static str;

    /// Query the source and return normalized hosts
    async fn query(&self) -> Result<BTreeSet<String>>;
}

/// Query every source concurrently and merge what they return
///
/// All sources run to completion before this returns. A failing source is
/// logged and contributes nothing.
pub async fn collect_candidates(sources: &[Box<dyn CandidateSource>]) -> BTreeSet<String> {
    let results = join_all(sources.iter().map(|source| async move {
        match source.query().await {
            Ok(hosts) => {
                info!(source = source.name(), count = hosts.len(), "source finished");
                hosts
            }
            Err(e) => {
                warn!(source = source.name(), error = %e, "source failed");
                BTreeSet::new()
            }
        }
    }))
    .await;

    results.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScoutError;

    struct Fixed(&'static str, Vec<&'static str>);

    #[async_trait]
    impl CandidateSource for Fixed {
        fn name(&self) -> &'static str {
            self.0
        }

        async fn query(&self) -> Result<BTreeSet<String>> {
            Ok(self.1.iter().map(|s| s.to_string()).collect())
        }
    }

    struct Broken;

    #[async_trait]
    impl CandidateSource for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        async fn query(&self) -> Result<BTreeSet<String>> {
            Err(ScoutError::ParseError("unexpected shape".to_string()))
        }
    }

    #[tokio::test]
    async fn test_collect_merges_sources() {
        let sources: Vec<Box<dyn CandidateSource>> = vec![
            Box::new(Fixed("one", vec!["a.example", "b.example"])),
            Box::new(Fixed("two", vec!["b.example", "c.example"])),
        ];
        let hosts = collect_candidates(&sources).await;
        assert_eq!(
            hosts.into_iter().collect::<Vec<_>>(),
            vec!["a.example", "b.example", "c.example"]
        );
    }

    #[tokio::test]
    async fn test_failing_source_does_not_stop_others() {
        let sources: Vec<Box<dyn CandidateSource>> = vec![
            Box::new(Broken),
            Box::new(Fixed("ok", vec!["a.example"])),
        ];
        let hosts = collect_candidates(&sources).await;
        assert_eq!(hosts.len(), 1);
        assert!(hosts.contains("a.example"));
    }

    #[tokio::test]
    async fn test_no_sources() {
        assert!(collect_candidates(&[]).await.is_empty());
    }
}

//! Numbered target site page scan
//!
//! Walks the numbered mirror pages of the target site and pulls every
//! stream host referenced in the HTML. When a renderer is configured the
//! same pages are scanned a second time through it, to catch hosts that
//! only appear after page scripts run.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, info, warn};

use super::CandidateSource;
use crate::candidate::{extract_hosts, host_pattern};
use crate::error::{Result, ScoutError};
use crate::fetcher::PageFetcher;
use crate::url::build_page_url;

/// Scans numbered target pages for stream hosts
pub struct TargetPageSource {
    fetcher: Arc<dyn PageFetcher>,
    renderer: Option<Arc<dyn PageFetcher>>,
    template: String,
    pages: RangeInclusive<u32>,
    max_pages: usize,
    pattern: Regex,
}

impl TargetPageSource {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        template: impl Into<String>,
        pages: RangeInclusive<u32>,
        max_pages: usize,
        keyword: &str,
    ) -> Result<Self> {
        Ok(Self {
            fetcher,
            renderer: None,
            template: template.into(),
            pages,
            max_pages,
            pattern: host_pattern(keyword)?,
        })
    }

    /// Add a second, rendered pass over the same pages
    pub fn with_renderer(mut self, renderer: Option<Arc<dyn PageFetcher>>) -> Self {
        self.renderer = renderer;
        self
    }

    fn page_urls(&self) -> impl Iterator<Item = String> + '_ {
        self.pages
            .clone()
            .take(self.max_pages)
            .map(|n| build_page_url(&self.template, n))
    }

    /// One sequential pass over every page with a given fetcher
    ///
    /// Page failures are skipped. A renderer that cannot start ends the
    /// pass, since every following page would fail the same way.
    async fn scan(&self, fetcher: &dyn PageFetcher) -> BTreeSet<String> {
        let mut hosts = BTreeSet::new();

        for url in self.page_urls() {
            match fetcher.fetch_page(&url).await {
                Ok(html) => {
                    let found = extract_hosts(&self.pattern, &html);
                    if !found.is_empty() {
                        debug!(url = %url, kind = fetcher.kind(), count = found.len(), "hosts on page");
                    }
                    hosts.extend(found);
                }
                Err(ScoutError::RenderUnavailable(reason)) => {
                    warn!(kind = fetcher.kind(), reason = %reason, "renderer unavailable, skipping pass");
                    break;
                }
                Err(e) => {
                    debug!(url = %url, kind = fetcher.kind(), error = %e, "page skipped");
                }
            }
        }

        hosts
    }
}

#[async_trait]
impl CandidateSource for TargetPageSource {
    fn name(&self) -> &'static str {
        "target-pages"
    }

    async fn query(&self) -> Result<BTreeSet<String>> {
        let mut hosts = self.scan(self.fetcher.as_ref()).await;

        if let Some(renderer) = &self.renderer {
            let rendered = self.scan(renderer.as_ref()).await;
            let added = rendered.difference(&hosts).count();
            info!(added, "rendered pass finished");
            hosts.extend(rendered);
        }

        Ok(hosts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ScoutClient;
    use crate::fetcher::StaticFetcher;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct FakeRenderer {
        html: &'static str,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PageFetcher for FakeRenderer {
        fn kind(&self) -> &'static str {
            "fake-rendered"
        }

        async fn fetch_page(&self, _url: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.html.to_string())
        }
    }

    struct MissingBrowser {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PageFetcher for MissingBrowser {
        fn kind(&self) -> &'static str {
            "missing"
        }

        async fn fetch_page(&self, _url: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ScoutError::RenderUnavailable("chrome not found".to_string()))
        }
    }

    async fn pages_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page67"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<script>player.src = "https://kodiaq.zirvedesin24.sbs/yayin1.m3u8";</script>"#,
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/page68"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/page69"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<iframe src="https://panda.zirvedesin31.sbs/embed"></iframe>"#,
            ))
            .mount(&server)
            .await;
        server
    }

    fn static_source(server: &MockServer, pages: RangeInclusive<u32>, max: usize) -> TargetPageSource {
        let fetcher = Arc::new(StaticFetcher::new(ScoutClient::new().unwrap()));
        TargetPageSource::new(
            fetcher,
            format!("{}/page{{n}}", server.uri()),
            pages,
            max,
            "zirvedesin",
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_scan_skips_failed_pages() {
        let server = pages_server().await;
        let source = static_source(&server, 67..=69, 10);

        let hosts = source.query().await.unwrap();
        assert_eq!(
            hosts.into_iter().collect::<Vec<_>>(),
            vec!["kodiaq.zirvedesin24.sbs", "panda.zirvedesin31.sbs"]
        );
    }

    #[tokio::test]
    async fn test_scan_respects_max_pages() {
        let server = pages_server().await;
        let source = static_source(&server, 67..=200, 1);

        let hosts = source.query().await.unwrap();
        assert_eq!(hosts.len(), 1);
        assert!(hosts.contains("kodiaq.zirvedesin24.sbs"));
    }

    #[tokio::test]
    async fn test_rendered_pass_adds_hosts() {
        let server = pages_server().await;
        let renderer = Arc::new(FakeRenderer {
            html: r#"<video src="https://koala.zirvedesin5.xyz/yayinzirve.m3u8"></video>"#,
            calls: AtomicUsize::new(0),
        });
        let source = static_source(&server, 67..=69, 10)
            .with_renderer(Some(renderer.clone() as Arc<dyn PageFetcher>));

        let hosts = source.query().await.unwrap();
        assert!(hosts.contains("koala.zirvedesin5.xyz"));
        assert!(hosts.contains("kodiaq.zirvedesin24.sbs"));
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_unavailable_renderer_stops_after_first_page() {
        let server = pages_server().await;
        let renderer = Arc::new(MissingBrowser {
            calls: AtomicUsize::new(0),
        });
        let source = static_source(&server, 67..=69, 10)
            .with_renderer(Some(renderer.clone() as Arc<dyn PageFetcher>));

        let hosts = source.query().await.unwrap();
        assert_eq!(hosts.len(), 2);
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 1);
    }
}

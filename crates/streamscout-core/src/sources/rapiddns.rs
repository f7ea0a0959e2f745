//! RapidDNS search page scrape
//!
//! The search page lists one subdomain per table cell. Cells are read with
//! a CSS selector; when the table is missing (layout change, block page)
//! the whole document text is scanned instead.

use std::collections::BTreeSet;

use async_trait::async_trait;
use regex::Regex;
use scraper::{Html, Selector};

use super::CandidateSource;
use crate::candidate::{extract_hosts, host_pattern};
use crate::client::ScoutClient;
use crate::error::{Result, ScoutError};
use crate::url::build_rapiddns_url;

/// Scrapes the RapidDNS search results for a keyword
pub struct RapidDnsSource {
    client: ScoutClient,
    base_url: String,
    keyword: String,
    pattern: Regex,
}

impl RapidDnsSource {
    pub fn new(
        client: ScoutClient,
        base_url: impl Into<String>,
        keyword: impl Into<String>,
    ) -> Result<Self> {
        let keyword = keyword.into();
        let pattern = host_pattern(&keyword)?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            keyword,
            pattern,
        })
    }
}

#[async_trait]
impl CandidateSource for RapidDnsSource {
    fn name(&self) -> &'static str {
        "rapiddns"
    }

    async fn query(&self) -> Result<BTreeSet<String>> {
        let url = build_rapiddns_url(&self.base_url, &self.keyword);
        let html = self.client.fetch(&url).await?;
        parse_search_page(&html, &self.pattern)
    }
}

/// Extracts matching hosts from a RapidDNS result page
fn parse_search_page(html: &str, pattern: &Regex) -> Result<BTreeSet<String>> {
    let document = Html::parse_document(html);
    let cell_selector = Selector::parse("table td")
        .map_err(|e| ScoutError::ParseError(format!("Invalid selector: {:?}", e)))?;

    let mut hosts = BTreeSet::new();
    for cell in document.select(&cell_selector) {
        let text: String = cell.text().collect();
        hosts.extend(extract_hosts(pattern, text.trim()));
    }

    if hosts.is_empty() {
        let text: String = document.root_element().text().collect();
        hosts.extend(extract_hosts(pattern, &text));
    }

    Ok(hosts)
}

//! crt.sh certificate transparency query

use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::Deserialize;

use super::CandidateSource;
use crate::candidate::normalize_host;
use crate::client::ScoutClient;
use crate::error::Result;
use crate::url::build_crtsh_url;

#[derive(Debug, Deserialize)]
struct CrtShEntry {
    #[serde(default)]
    common_name: Option<String>,
    /// Newline separated SAN list
    #[serde(default)]
    name_value: String,
}

/// Looks up certificates whose names contain a keyword
pub struct CrtShSource {
    client: ScoutClient,
    base_url: String,
    keyword: String,
}

impl CrtShSource {
    pub fn new(client: ScoutClient, base_url: impl Into<String>, keyword: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            keyword: keyword.into(),
        }
    }
}

#[async_trait]
impl CandidateSource for CrtShSource {
    fn name(&self) -> &'static str {
        "crt.sh"
    }

    async fn query(&self) -> Result<BTreeSet<String>> {
        let url = build_crtsh_url(&self.base_url, &self.keyword);
        let entries: Vec<CrtShEntry> = self.client.fetch_json(&url).await?;
        Ok(hosts_from_entries(&entries, &self.keyword))
    }
}

fn hosts_from_entries(entries: &[CrtShEntry], keyword: &str) -> BTreeSet<String> {
    let keyword = keyword.to_ascii_lowercase();
    entries
        .iter()
        .flat_map(|entry| entry.name_value.lines().chain(entry.common_name.as_deref()))
        .filter_map(normalize_host)
        .filter(|host| host.contains(&keyword))
        .collect()
}

//! certspotter issuance API query

use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::Deserialize;

use super::CandidateSource;
use crate::candidate::normalize_host;
use crate::client::ScoutClient;
use crate::error::Result;
use crate::url::build_certspotter_url;

#[derive(Debug, Deserialize)]
struct Issuance {
    #[serde(default)]
    dns_names: Vec<String>,
}

/// Lists DNS names from certificates issued under an apex domain
pub struct CertSpotterSource {
    client: ScoutClient,
    base_url: String,
    domain: String,
}

impl CertSpotterSource {
    pub fn new(client: ScoutClient, base_url: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            domain: domain.into(),
        }
    }
}

#[async_trait]
impl CandidateSource for CertSpotterSource {
    fn name(&self) -> &'static str {
        "certspotter"
    }

    async fn query(&self) -> Result<BTreeSet<String>> {
        let url = build_certspotter_url(&self.base_url, &self.domain);
        let issuances: Vec<Issuance> = self.client.fetch_json(&url).await?;
        Ok(issuances
            .iter()
            .flat_map(|i| i.dns_names.iter())
            .filter_map(|name| normalize_host(name))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_query_collects_dns_names() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/issuances"))
            .and(query_param("domain", "zirvedesin.sbs"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"[
                    {"id": "1", "dns_names": ["*.zirvedesin.sbs", "zirvedesin.sbs"]},
                    {"id": "2", "dns_names": ["Grizzly.Zirvedesin.sbs"]},
                    {"id": "3"}
                ]"#,
            ))
            .mount(&server)
            .await;

        let source =
            CertSpotterSource::new(ScoutClient::new().unwrap(), server.uri(), "zirvedesin.sbs");
        let hosts = source.query().await.unwrap();
        assert_eq!(
            hosts.into_iter().collect::<Vec<_>>(),
            vec!["grizzly.zirvedesin.sbs", "zirvedesin.sbs"]
        );
    }

    #[tokio::test]
    async fn test_query_not_found_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let source =
            CertSpotterSource::new(ScoutClient::new().unwrap(), server.uri(), "zirvedesin.sbs");
        assert!(source.query().await.is_err());
    }
}

//! End-to-end run: discover, assemble, write

use std::path::PathBuf;

use chrono::Utc;
use tracing::info;

use crate::client::ScoutClient;
use crate::config::ScoutConfig;
use crate::discovery::{Discoverer, Origin};
use crate::error::Result;
use crate::playlist::PlaylistAssembler;

/// What a pipeline run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub base_url: String,
    pub origin: Origin,
    pub channels: usize,
    pub supplementary_appended: bool,
    pub output: PathBuf,
}

/// Discovery plus playlist assembly, wired from one [`ScoutConfig`]
pub struct Pipeline {
    client: ScoutClient,
    discoverer: Discoverer,
    assembler: PlaylistAssembler,
}

impl Pipeline {
    /// Build the client, discoverer and assembler from one configuration
    ///
    /// # Errors
    /// - `HttpError` - The HTTP client could not be built
    /// - `InvalidConfig` - The discovery configuration was rejected
    pub fn new(config: ScoutConfig) -> Result<Self> {
        let client = ScoutClient::with_config(&config.client)?;
        let discoverer = Discoverer::new(config.discovery, client.clone())?;
        Ok(Self::from_parts(client, discoverer, PlaylistAssembler::new(config.playlist)))
    }

    /// Assemble a pipeline from prebuilt parts
    pub fn from_parts(
        client: ScoutClient,
        discoverer: Discoverer,
        assembler: PlaylistAssembler,
    ) -> Self {
        Self {
            client,
            discoverer,
            assembler,
        }
    }

    /// Run once and write the playlist
    ///
    /// # Returns
    /// A [`RunSummary`] describing the written file.
    ///
    /// # Errors
    /// Only a failure to write the output file is returned; every other
    /// failure is absorbed and logged along the way.
    pub async fn run(&self) -> Result<RunSummary> {
        let discovery = self.discoverer.discover().await;
        info!(url = %discovery.base_url, origin = ?discovery.origin, "base URL resolved");

        let supplementary = self.assembler.fetch_supplementary(&self.client).await;
        let document = self
            .assembler
            .render(&discovery.base_url, Utc::now(), supplementary.as_deref());
        let output = self.assembler.write(&document).await?.to_path_buf();

        let channels = self.assembler.config().channels.len();
        info!(path = %output.display(), channels, "playlist written");

        Ok(RunSummary {
            base_url: discovery.base_url,
            origin: discovery.origin,
            channels,
            supplementary_appended: supplementary.is_some(),
            output,
        })
    }
}

//! M3U playlist assembly
//!
//! Builds one entry per channel against the discovered base URL, then
//! appends a supplementary playlist fetched from elsewhere.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::client::ScoutClient;
use crate::error::Result;
use crate::url::join_stream_url;

/// Default channel table: index to stream file on the base host
pub fn default_channels() -> BTreeMap<u32, String> {
    [
        "yayinzirve.m3u8",
        "yayin1.m3u8",
        "yayinb2.m3u8",
        "yayinb3.m3u8",
        "yayinb4.m3u8",
        "yayinb5.m3u8",
        "yayinbm1.m3u8",
        "yayinbm2.m3u8",
        "yayinss.m3u8",
        "yayinss2.m3u8",
        "yayint1.m3u8",
        "yayint2.m3u8",
        "yayint3.m3u8",
        "yayinsmarts.m3u8",
        "yayinsms2.m3u8",
        "yayintrtspor.m3u8",
        "yayintrtspor2.m3u8",
        "yayinas.m3u8",
        "yayinatv.m3u8",
        "yayintv8.m3u8",
        "yayintv85.m3u8",
        "yayinnbatv.m3u8",
        "yayinex1.m3u8",
        "yayinex2.m3u8",
    ]
    .iter()
    .enumerate()
    .map(|(i, file)| (i as u32 + 1, file.to_string()))
    .collect()
}

/// Configuration for playlist assembly
#[derive(Debug, Clone)]
pub struct PlaylistConfig {
    pub output_path: PathBuf,
    /// Sent to players as the referrer for every channel
    pub referrer_url: String,
    pub group_title: String,
    /// User agent players should present
    pub user_agent_hint: String,
    /// Remote playlist appended after the channel entries
    pub supplementary_url: String,
    /// Name shown in the section marker above the appended playlist
    pub supplementary_label: String,
    pub channels: BTreeMap<u32, String>,
}

impl Default for PlaylistConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("dengetv.m3u"),
            referrer_url: "https://dengetv67.live/".to_string(),
            group_title: "DengeTV".to_string(),
            user_agent_hint: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
            supplementary_url: "https://raw.githubusercontent.com/xplatin/iptv/main/xplatin.m3u"
                .to_string(),
            supplementary_label: "Xplatin".to_string(),
            channels: default_channels(),
        }
    }
}

/// Derives the display name for a channel file
///
/// Drops the extension, separates trailing digits with a space and title
/// cases the result.
///
/// # Example
/// ```
/// use streamscout_core::display_name;
/// assert_eq!(display_name("yayin1.m3u8"), "Yayin 1");
/// assert_eq!(display_name("a.m3u8"), "A");
/// ```
pub fn display_name(file: &str) -> String {
    let stem = file.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(file);
    let digits_at = stem
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i);

    let spaced = match digits_at {
        Some(i) if i > 0 => format!("{} {}", &stem[..i], &stem[i..]),
        _ => stem.to_string(),
    };

    title_case(&spaced)
}

/// Upper-cases each letter that follows a non-letter, lower-cases the rest
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

/// Builds playlist documents from a [`PlaylistConfig`]
pub struct PlaylistAssembler {
    config: PlaylistConfig,
}

impl PlaylistAssembler {
    pub fn new(config: PlaylistConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlaylistConfig {
        &self.config
    }

    /// Header plus one block per channel, in index order
    pub fn channel_lines(&self, base_url: &str, generated_at: DateTime<Utc>) -> Vec<String> {
        let config = &self.config;
        let mut lines = vec![
            "#EXTM3U".to_string(),
            format!("# Generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S UTC")),
            format!("# Base URL: {}", base_url),
            format!("# Referrer: {}", config.referrer_url),
        ];

        for file in config.channels.values() {
            lines.push(format!(
                "#EXTINF:-1 group-title=\"{}\",{}",
                config.group_title,
                display_name(file)
            ));
            lines.push(format!("#EXTVLCOPT:http-user-agent={}", config.user_agent_hint));
            lines.push(format!("#EXTVLCOPT:http-referrer={}", config.referrer_url));
            lines.push(join_stream_url(base_url, file));
        }

        lines
    }

    /// Full document text, with the supplementary playlist appended if present
    pub fn render(
        &self,
        base_url: &str,
        generated_at: DateTime<Utc>,
        supplementary: Option<&str>,
    ) -> String {
        let mut document = self.channel_lines(base_url, generated_at).join("\n");
        document.push('\n');

        // appended as fetched, only a missing final newline is added
        if let Some(extra) = supplementary {
            document.push_str(&format!("\n# ==== {} ====\n", self.config.supplementary_label));
            document.push_str(extra);
            if !extra.ends_with('\n') {
                document.push('\n');
            }
        }
        document
    }

    /// Fetch the supplementary playlist, `None` on any failure
    pub async fn fetch_supplementary(&self, client: &ScoutClient) -> Option<String> {
        match client.fetch(&self.config.supplementary_url).await {
            Ok(text) if !text.trim().is_empty() => {
                info!(url = %self.config.supplementary_url, bytes = text.len(), "supplementary playlist fetched");
                Some(text)
            }
            Ok(_) => {
                warn!(url = %self.config.supplementary_url, "supplementary playlist empty, skipping");
                None
            }
            Err(e) => {
                warn!(url = %self.config.supplementary_url, error = %e, "supplementary playlist unavailable, skipping");
                None
            }
        }
    }

    /// Replace the output file with `document`
    pub async fn write(&self, document: &str) -> Result<&Path> {
        tokio::fs::write(&self.config.output_path, document).await?;
        Ok(self.config.output_path.as_path())
    }
}

//! Command line arguments
//!
//! Every argument is optional; running with none reproduces the scheduled
//! job's defaults.

use std::path::PathBuf;

use clap::Parser;
use streamscout_core::{BruteForcePolicy, ScoutConfig};

/// Finds a live stream domain and writes an M3U playlist for it
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Playlist output path
    #[arg(short, long, env = "STREAMSCOUT_OUTPUT", default_value = "dengetv.m3u")]
    pub output: PathBuf,

    /// Discovery cache file
    #[arg(long, env = "STREAMSCOUT_CACHE", default_value = ".domain_cache.json")]
    pub cache_file: PathBuf,

    /// Optional operator host list, one host per line
    #[arg(long, env = "STREAMSCOUT_MANUAL_DOMAINS", default_value = "manual_domains.txt")]
    pub manual_domains: PathBuf,

    /// Append-only log file, mirrored to the console
    #[arg(long, env = "STREAMSCOUT_LOG_FILE", default_value = "streamscout.log")]
    pub log_file: PathBuf,

    /// Seconds a cached base URL stays valid
    #[arg(long, env = "STREAMSCOUT_CACHE_TTL", default_value_t = 6 * 60 * 60)]
    pub cache_ttl: u64,

    /// Maximum validation probes in flight
    #[arg(short, long, env = "STREAMSCOUT_CONCURRENCY", default_value_t = 50)]
    pub concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(long, env = "STREAMSCOUT_TIMEOUT", default_value_t = 20)]
    pub timeout: u64,

    /// When to add brute-force candidates: when-empty, always, never
    #[arg(long, env = "STREAMSCOUT_BRUTE_FORCE", default_value_t = BruteForcePolicy::WhenEmpty)]
    pub brute_force: BruteForcePolicy,

    /// Skip the headless browser pass over the target pages
    #[arg(long, env = "STREAMSCOUT_NO_RENDER")]
    pub no_render: bool,

    /// Remote playlist appended to the output
    #[arg(long, env = "STREAMSCOUT_SUPPLEMENTARY_URL")]
    pub supplementary_url: Option<String>,

    /// Log debug output from the discovery pipeline
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Build the pipeline configuration on top of the library defaults
    pub fn to_config(&self) -> ScoutConfig {
        let mut config = ScoutConfig::default();

        config.client.timeout_secs = self.timeout;

        config.discovery.cache_path = self.cache_file.clone();
        config.discovery.manual_domains_path = self.manual_domains.clone();
        config.discovery.cache_ttl_seconds = self.cache_ttl;
        config.discovery.concurrency_limit = self.concurrency;
        config.discovery.brute_force_policy = self.brute_force;
        config.discovery.render_pages = !self.no_render;

        config.playlist.output_path = self.output.clone();
        if let Some(url) = &self.supplementary_url {
            config.playlist.supplementary_url = url.clone();
        }

        config
    }
}

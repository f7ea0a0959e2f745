//! Streamscout Core Library
//!
//! Finds a live stream distribution domain and builds an M3U playlist
//! against it.
//!
//! # Overview
//!
//! Discovery runs in stages, each one allowed to fail without stopping the
//! next:
//! - a local cache with a time-to-live
//! - an optional operator-supplied host list
//! - four candidate sources (crt.sh, certspotter, RapidDNS, the numbered
//!   target site pages)
//! - a brute-force generator over the known naming convention
//! - concurrent validation, first reachable host wins
//! - a fixed fallback URL when nothing validates
//!
//! # Example
//!
//! ```no_run
//! use streamscout_core::{Pipeline, Result, ScoutConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let pipeline = Pipeline::new(ScoutConfig::default())?;
//!     let summary = pipeline.run().await?;
//!     println!("{} -> {}", summary.base_url, summary.output.display());
//!     Ok(())
//! }
//! ```
//!
//! # Rendering
//!
//! Building with the `render` feature adds a headless Chromium pass over the
//! target pages. Without it, or when no browser can be launched, only the
//! static HTML is scanned.

mod bruteforce;
mod cache;
mod candidate;
mod client;
mod config;
mod discovery;
mod error;
pub mod fetcher;
mod pipeline;
mod playlist;
pub mod sources;
pub mod url;
mod validator;

// Re-export client types
pub use client::{ClientConfig, ProbeResponse, ScoutClient, USER_AGENTS, random_user_agent};

// Re-export error types
pub use error::{Result, ScoutError};

// Re-export configuration
pub use config::{
    BruteForceConfig, BruteForcePolicy, DiscoveryConfig, ScoutConfig, SourceEndpoints,
    default_validation_paths,
};

// Re-export discovery building blocks
pub use bruteforce::generate_bruteforce_candidates;
pub use cache::{CacheRecord, CacheStore};
pub use candidate::{extract_hosts, host_pattern, normalize_candidates, normalize_host};
pub use discovery::{Discoverer, Discovery, Origin, default_sources};
pub use validator::{ValidatedHost, Validator};

// Re-export playlist assembly and the end-to-end pipeline
pub use pipeline::{Pipeline, RunSummary};
pub use playlist::{PlaylistAssembler, PlaylistConfig, default_channels, display_name};

use anyhow::{Context, Result};
use clap::Parser;
use streamscout_core::Pipeline;
use tracing::{info, warn};

mod args;
mod logging;

use args::Args;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = logging::init_tracing(&args.log_file, args.verbose);

    let pipeline = Pipeline::new(args.to_config()).context("Building discovery pipeline")?;

    info!("Starting stream domain discovery");
    tokio::select! {
        result = pipeline.run() => {
            let summary = result.context("Writing playlist")?;
            info!(
                "Playlist with {} channels written to {} (base {}, {:?})",
                summary.channels,
                summary.output.display(),
                summary.base_url,
                summary.origin
            );
            if !summary.supplementary_appended {
                warn!("Playlist written without the supplementary section");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            warn!("Caught CTRL+C signal, stopping");
        }
    }

    Ok(())
}

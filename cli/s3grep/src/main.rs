//! s3grep CLI
//!
//! Substring search over S3 objects using S3 Select.

use clap::Parser;

mod args;
mod run;

use args::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // Logging goes to stderr, so stdout is clean for matches
    run::init_logging(args.log_level)?;

    let stats = run::execute(args).await?;

    if let Some(duration) = stats.duration() {
        tracing::debug!(
            objects = stats.objects_scanned,
            bytes_scanned = stats.bytes_scanned,
            bytes_returned = stats.bytes_returned,
            duration_ms = duration.num_milliseconds(),
            "Done"
        );
    }

    Ok(())
}

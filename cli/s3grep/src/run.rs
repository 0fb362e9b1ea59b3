//! Main execution logic for the s3grep CLI.

use anyhow::{Context, Result};
use sg_error::ErrorKind;
use sg_search::{S3Config, S3Store, SearchStats, Searcher, create_s3_client};
use tracing::Level;
use tracing_subscriber::fmt;

use crate::args::{Cli, LogLevel};

/// Initialize logging.
pub fn init_logging(level: LogLevel) -> Result<()> {
    let level: Level = level.into();

    let subscriber = fmt::Subscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr); // stdout carries only matches

    subscriber.init();

    Ok(())
}

/// Build the S3 configuration from CLI arguments.
fn s3_config(args: &Cli) -> S3Config {
    let mut config = S3Config::new();

    if let Some(region) = &args.region {
        config = config.with_region(region);
    }

    if let Some(endpoint) = &args.s3_endpoint {
        config = config.with_endpoint(endpoint);
    }

    if args.access_key.is_some() || args.secret_key.is_some() {
        config.access_key = args.access_key.clone();
        config.secret_key = args.secret_key.clone();
        config.session_token = args.session_token.clone();
    }

    if let Some(profile) = &args.profile {
        config = config.with_profile(profile);
    }

    if let Some(timeout_secs) = args.timeout_secs {
        config = config.with_timeout(timeout_secs);
    }

    config
}

/// Execute the search with the provided arguments.
pub async fn execute(args: Cli) -> Result<SearchStats> {
    let client = create_s3_client(&s3_config(&args))
        .await
        .context("Unable to create S3 client")?;
    let searcher = Searcher::new(S3Store::new(client));

    let mut stdout = std::io::stdout().lock();

    searcher
        .run(&args.path, &args.term, &mut stdout)
        .await
        .map_err(|e| {
            let context = match e.kind() {
                ErrorKind::InvalidPath => "Unable to parse path",
                ErrorKind::List => "Error listing prefix",
                _ => "Error scanning",
            };
            anyhow::Error::new(e).context(context)
        })
}

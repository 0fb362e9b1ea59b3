//! The resolve-then-scan protocol.

use std::io::Write;

use sg_error::Result;
use tracing::{debug, info};

use crate::location::{Location, resolve};
use crate::scanner::scan_object;
use crate::stats::SearchStats;
use crate::store::ObjectStore;
use crate::walker::walk;

/// Which interpretation of the location is being tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    /// The key names one object; scan it without a header.
    SingleObject,

    /// The key is a prefix; scan every object under it with headers.
    PrefixWalk,
}

/// Runs searches against an [`ObjectStore`].
///
/// A location is first treated as a single object. Only when the store says
/// there is no such object does the search move on to scanning the location
/// as a prefix. Objects are scanned one after another and the first failure
/// ends the run.
pub struct Searcher<S: ObjectStore> {
    store: S,
}

impl<S: ObjectStore> Searcher<S> {
    /// Create a new Searcher over a store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Search `path` for lines containing `term`, writing them to `out`.
    ///
    /// Output already written is kept when a later object fails.
    ///
    /// # Returns
    ///
    /// Statistics about the run.
    pub async fn run<W: Write>(&self, path: &str, term: &str, out: &mut W) -> Result<SearchStats> {
        let location = resolve(path)?;
        let mut stats = SearchStats::new();
        let mut phase = ScanPhase::SingleObject;

        debug!(bucket = %location.bucket, key = %location.key, "Starting search");

        loop {
            match phase {
                ScanPhase::SingleObject => {
                    match scan_object(
                        &self.store,
                        &location.bucket,
                        &location.key,
                        term,
                        false,
                        out,
                        &mut stats,
                    )
                    .await
                    {
                        Ok(()) => break,
                        Err(e) if e.is_not_found() => {
                            debug!(key = %location.key, "Not an object, scanning as prefix");
                            phase = ScanPhase::PrefixWalk;
                        }
                        Err(e) => return Err(e),
                    }
                }
                ScanPhase::PrefixWalk => {
                    self.scan_prefix(&location, term, out, &mut stats).await?;
                    break;
                }
            }
        }

        stats.complete();

        info!(
            objects_scanned = stats.objects_scanned,
            chunks_written = stats.chunks_written,
            bytes_written = stats.bytes_written,
            bytes_scanned = stats.bytes_scanned,
            "Search completed"
        );

        Ok(stats)
    }

    /// Scan every object under the location's key, stopping at the first failure.
    ///
    /// A failed scan stops the walk and takes priority over the walk's own
    /// result.
    async fn scan_prefix<W: Write>(
        &self,
        location: &Location,
        term: &str,
        out: &mut W,
        stats: &mut SearchStats,
    ) -> Result<()> {
        let mut failure = None;

        let walked = walk(
            &self.store,
            &location.bucket,
            &location.key,
            async |key: &str| {
                match scan_object(&self.store, &location.bucket, key, term, true, out, stats)
                    .await
                {
                    Ok(()) => true,
                    Err(e) => {
                        debug!(key = %key, error = %e, "Scan failed, stopping walk");
                        failure = Some(e);
                        false
                    }
                }
            },
        )
        .await;

        match failure {
            Some(e) => Err(e),
            None => walked,
        }
    }
}

//! Scanning of a single object.

use std::io::Write;

use sg_error::{Result, SearchError};
use tracing::{debug, trace};

use crate::location::is_directory_marker;
use crate::query::build_query;
use crate::stats::SearchStats;
use crate::store::{ObjectStore, SelectEvent, SelectStream};

/// Scan one object for `term` and write the matching lines to `out`.
///
/// Keys that are empty or end in `/` are rejected with
/// [`SearchError::ObjectNotFound`] without contacting the store. Otherwise a
/// select request is submitted and each records chunk is written verbatim
/// and flushed as it arrives. A record may span several chunks. With
/// `print_header`, a `=== key ===` line is written once the request is
/// accepted, whether or not anything matches.
///
/// The result stream is always closed after consumption. A failed close is
/// reported as [`SearchError::Stream`] even when matches were already written.
pub async fn scan_object<S, W>(
    store: &S,
    bucket: &str,
    key: &str,
    term: &str,
    print_header: bool,
    out: &mut W,
    stats: &mut SearchStats,
) -> Result<()>
where
    S: ObjectStore + ?Sized,
    W: Write,
{
    if key.is_empty() || is_directory_marker(key) {
        return Err(SearchError::not_found(bucket, key));
    }

    let request = build_query(bucket, key, term);

    debug!(
        bucket = %bucket,
        key = %key,
        compression = %request.input.compression,
        "Scanning object"
    );

    let mut stream = store.select(&request).await?;
    stats.record_object();

    let written = write_results(&mut stream, key, print_header, out, stats).await;
    stream.close().await?;

    written
}

async fn write_results<W: Write>(
    stream: &mut Box<dyn SelectStream>,
    key: &str,
    print_header: bool,
    out: &mut W,
    stats: &mut SearchStats,
) -> Result<()> {
    if print_header {
        writeln!(out, "=== {} ===", key)?;
        out.flush()?;
    }

    while let Some(event) = stream.next_event().await {
        match event {
            SelectEvent::Records(payload) => {
                if payload.is_empty() {
                    continue;
                }

                out.write_all(&payload)?;
                out.flush()?;

                stats.record_chunk(payload.len());
            }
            SelectEvent::Stats(progress) => {
                trace!(key = %key, ?progress, "Select stats");
                stats.record_progress(progress);
            }
            SelectEvent::Progress(progress) => {
                trace!(key = %key, ?progress, "Select progress");
            }
            SelectEvent::Continuation => {}
            SelectEvent::End => {
                trace!(key = %key, "Select end");
            }
        }
    }

    Ok(())
}

//! Statistics for search runs.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::store::ScanProgress;

/// Statistics collected during a search run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchStats {
    /// When the search started
    pub started_at: Option<DateTime<Utc>>,

    /// When the search completed
    pub completed_at: Option<DateTime<Utc>>,

    /// Objects whose select request was accepted
    pub objects_scanned: usize,

    /// Records chunks written to the output
    pub chunks_written: usize,

    /// Bytes of matched content written to the output
    pub bytes_written: u64,

    /// Bytes the service scanned, summed over stats events
    pub bytes_scanned: u64,

    /// Bytes the service processed after decompression
    pub bytes_processed: u64,

    /// Bytes the service returned
    pub bytes_returned: u64,
}

impl SearchStats {
    /// Create a new stats tracker with the current time as start time.
    pub fn new() -> Self {
        Self {
            started_at: Some(Utc::now()),
            ..Default::default()
        }
    }

    /// Mark the search as complete with the current time.
    pub fn complete(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    /// Record an object whose scan has started.
    pub fn record_object(&mut self) {
        self.objects_scanned += 1;
    }

    /// Record a records chunk written to the output.
    pub fn record_chunk(&mut self, len: usize) {
        self.chunks_written += 1;
        self.bytes_written += len as u64;
    }

    /// Add the final counters of one select request.
    pub fn record_progress(&mut self, progress: ScanProgress) {
        self.bytes_scanned += progress.bytes_scanned;
        self.bytes_processed += progress.bytes_processed;
        self.bytes_returned += progress.bytes_returned;
    }

    /// Get the duration of the search run.
    pub fn duration(&self) -> Option<Duration> {
        match (self.started_at, self.completed_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }
}

//! The storage capability the search runs against.
//!
//! [`ObjectStore`] is the seam between the search protocol and the remote
//! service. [`crate::s3::S3Store`] implements it over the AWS SDK; tests use an
//! in-memory implementation.

use async_trait::async_trait;
use bytes::Bytes;
use sg_error::Result;

use crate::query::QueryRequest;

/// One page of a prefix listing.
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    /// Keys on this page, in the store's listing order
    pub keys: Vec<String>,

    /// Token for the next page, `None` when this is the last page
    pub next_continuation: Option<String>,
}

/// Byte counters carried by stats and progress events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanProgress {
    pub bytes_scanned: u64,
    pub bytes_processed: u64,
    pub bytes_returned: u64,
}

/// An event from a select result stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectEvent {
    /// A chunk of matched records, printable verbatim
    Records(Bytes),

    /// Final byte counters for the query
    Stats(ScanProgress),

    /// Intermediate byte counters
    Progress(ScanProgress),

    /// Keep-alive
    Continuation,

    /// The query finished
    End,
}

/// Results of one select request.
///
/// Events are consumed with [`SelectStream::next_event`] until it returns
/// `None`. A receive failure ends the sequence early; it is reported by
/// [`SelectStream::close`], which must be called once consumption is over.
#[async_trait]
pub trait SelectStream: Send {
    /// Next event, or `None` once the stream has ended.
    async fn next_event(&mut self) -> Option<SelectEvent>;

    /// Release the stream, reporting any failure seen while receiving.
    async fn close(self: Box<Self>) -> Result<()>;
}

/// Operations the search needs from an object store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch one page of keys under `prefix`.
    ///
    /// Errors are reported as [`sg_error::SearchError::List`].
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        continuation: Option<String>,
    ) -> Result<ListPage>;

    /// Submit a select request.
    ///
    /// A missing object is reported as
    /// [`sg_error::SearchError::ObjectNotFound`]; any other rejection as
    /// [`sg_error::SearchError::RemoteQuery`].
    async fn select(&self, request: &QueryRequest) -> Result<Box<dyn SelectStream>>;
}

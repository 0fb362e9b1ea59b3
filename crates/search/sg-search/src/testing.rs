//! In-memory [`ObjectStore`] for unit tests.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use sg_error::{Result, SearchError};

use crate::query::QueryRequest;
use crate::store::{ListPage, ObjectStore, ScanProgress, SelectEvent, SelectStream};

/// How a select request for a key should fail.
#[derive(Debug, Clone, Copy)]
pub(crate) enum QueryFailure {
    /// The store answers "no such key" even though the key is listed
    Vanished,

    /// Access denied
    Denied,
}

/// Objects of a single bucket, held in key order.
///
/// Select requests are answered by evaluating the `LIKE '%term%'` predicate
/// line by line. By default each matching line is its own records event;
/// [`MemoryStore::with_chunk_size`] splits the matches at fixed byte offsets
/// instead, the way the service cuts records across message boundaries.
pub(crate) struct MemoryStore {
    objects: BTreeMap<String, String>,
    page_size: usize,
    chunk_size: Option<usize>,
    query_failures: HashMap<String, QueryFailure>,
    broken_streams: HashSet<String>,
    list_failure_page: Option<usize>,
    list_calls: Mutex<usize>,
    requests: Mutex<Vec<QueryRequest>>,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self {
            objects: BTreeMap::new(),
            page_size: 1000,
            chunk_size: None,
            query_failures: HashMap::new(),
            broken_streams: HashSet::new(),
            list_failure_page: None,
            list_calls: Mutex::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_object(mut self, key: &str, content: &str) -> Self {
        self.objects.insert(key.to_string(), content.to_string());
        self
    }

    pub(crate) fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Deliver matches as `chunk_size`-byte records payloads, ignoring line
    /// boundaries.
    pub(crate) fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = Some(chunk_size.max(1));
        self
    }

    pub(crate) fn with_query_failure(mut self, key: &str, failure: QueryFailure) -> Self {
        self.query_failures.insert(key.to_string(), failure);
        self
    }

    /// Matches are delivered, then the stream reports a failure on close.
    pub(crate) fn with_broken_stream(mut self, key: &str) -> Self {
        self.broken_streams.insert(key.to_string());
        self
    }

    /// Fail the listing when the zero-based page `page` is requested.
    pub(crate) fn with_list_failure_on_page(mut self, page: usize) -> Self {
        self.list_failure_page = Some(page);
        self
    }

    pub(crate) fn list_calls(&self) -> usize {
        *self.list_calls.lock().unwrap()
    }

    pub(crate) fn requests(&self) -> Vec<QueryRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Keys of every select request, in submission order.
    pub(crate) fn select_calls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.key).collect()
    }

    fn term_of(expression: &str) -> &str {
        expression
            .split_once("like '%")
            .and_then(|(_, rest)| rest.strip_suffix("%'"))
            .unwrap_or_default()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        continuation: Option<String>,
    ) -> Result<ListPage> {
        *self.list_calls.lock().unwrap() += 1;

        let start: usize = continuation.map(|t| t.parse().unwrap()).unwrap_or(0);

        if self.list_failure_page == Some(start / self.page_size) {
            return Err(SearchError::List {
                bucket: bucket.to_string(),
                prefix: prefix.to_string(),
                message: "InternalError: listing unavailable".to_string(),
            });
        }

        let matching: Vec<&String> = self
            .objects
            .keys()
            .filter(|key| key.starts_with(prefix))
            .collect();

        let end = (start + self.page_size).min(matching.len());
        let keys = matching[start.min(end)..end]
            .iter()
            .map(|key| key.to_string())
            .collect();

        Ok(ListPage {
            keys,
            next_continuation: (end < matching.len()).then(|| end.to_string()),
        })
    }

    async fn select(&self, request: &QueryRequest) -> Result<Box<dyn SelectStream>> {
        self.requests.lock().unwrap().push(request.clone());

        match self.query_failures.get(&request.key) {
            Some(QueryFailure::Vanished) => {
                return Err(SearchError::not_found(&request.bucket, &request.key));
            }
            Some(QueryFailure::Denied) => {
                return Err(SearchError::RemoteQuery {
                    key: request.key.clone(),
                    code: Some("AccessDenied".to_string()),
                    message: "AccessDenied: Access Denied".to_string(),
                });
            }
            None => {}
        }

        let content = self
            .objects
            .get(&request.key)
            .ok_or_else(|| SearchError::not_found(&request.bucket, &request.key))?;

        let term = Self::term_of(&request.expression);
        let progress = ScanProgress {
            bytes_scanned: content.len() as u64,
            bytes_processed: content.len() as u64,
            bytes_returned: 0,
        };

        let mut events = VecDeque::new();
        events.push_back(SelectEvent::Progress(progress));
        let matches: Vec<String> = content
            .lines()
            .filter(|line| line.contains(term))
            .map(|line| format!("{}\n", line))
            .collect();
        let returned: u64 = matches.iter().map(|m| m.len() as u64).sum();

        let payloads: Vec<Bytes> = match self.chunk_size {
            None => matches.into_iter().map(Bytes::from).collect(),
            Some(size) => Bytes::from(matches.concat())
                .chunks(size)
                .map(Bytes::copy_from_slice)
                .collect(),
        };
        for payload in payloads {
            events.push_back(SelectEvent::Records(payload));
            events.push_back(SelectEvent::Continuation);
        }
        events.push_back(SelectEvent::Stats(ScanProgress {
            bytes_returned: returned,
            ..progress
        }));
        events.push_back(SelectEvent::End);

        Ok(Box::new(MemoryStream {
            key: request.key.clone(),
            events,
            broken: self.broken_streams.contains(&request.key),
        }))
    }
}

struct MemoryStream {
    key: String,
    events: VecDeque<SelectEvent>,
    broken: bool,
}

#[async_trait]
impl SelectStream for MemoryStream {
    async fn next_event(&mut self) -> Option<SelectEvent> {
        let event = self.events.pop_front();

        // A broken stream ends before its End event
        if self.broken && matches!(event, Some(SelectEvent::End)) {
            self.events.clear();
            return None;
        }

        event
    }

    async fn close(self: Box<Self>) -> Result<()> {
        if self.broken {
            return Err(SearchError::Stream {
                key: self.key,
                message: "connection reset by peer".to_string(),
            });
        }
        Ok(())
    }
}

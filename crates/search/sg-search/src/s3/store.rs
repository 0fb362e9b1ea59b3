//! [`ObjectStore`] over the AWS SDK: `ListObjectsV2` and `SelectObjectContent`.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_s3::operation::select_object_content::SelectObjectContentOutput;
use aws_sdk_s3::types::{
    CsvInput, CsvOutput, ExpressionType, FileHeaderInfo, InputSerialization,
    OutputSerialization, SelectObjectContentEventStream,
};
use bytes::Bytes;
use sg_error::{Result, SearchError};
use tracing::{debug, trace};

use crate::query::{CompressionType, QueryRequest};
use crate::store::{ListPage, ObjectStore, ScanProgress, SelectEvent, SelectStream};

/// Service error code for a missing object.
const NO_SUCH_KEY: &str = "NoSuchKey";

/// S3-backed object store.
#[derive(Debug, Clone)]
pub struct S3Store {
    client: Client,
}

impl S3Store {
    /// Wrap an S3 client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        continuation: Option<String>,
    ) -> Result<ListPage> {
        let mut req = self.client.list_objects_v2().bucket(bucket);

        if !prefix.is_empty() {
            req = req.prefix(prefix);
        }

        if let Some(token) = continuation {
            req = req.continuation_token(token);
        }

        let resp = req.send().await.map_err(|e| SearchError::List {
            bucket: bucket.to_string(),
            prefix: prefix.to_string(),
            message: DisplayErrorContext(&e).to_string(),
        })?;

        let keys = resp
            .contents
            .unwrap_or_default()
            .into_iter()
            .filter_map(|obj| obj.key)
            .collect();

        let next_continuation = if resp.is_truncated == Some(true) {
            resp.next_continuation_token
        } else {
            None
        };

        Ok(ListPage {
            keys,
            next_continuation,
        })
    }

    async fn select(&self, request: &QueryRequest) -> Result<Box<dyn SelectStream>> {
        let input = InputSerialization::builder()
            .csv(
                CsvInput::builder()
                    .field_delimiter(&request.input.field_delimiter)
                    .record_delimiter(&request.input.record_delimiter)
                    .file_header_info(FileHeaderInfo::None)
                    .build(),
            )
            .compression_type(sdk_compression(request.input.compression))
            .build();

        let output = OutputSerialization::builder()
            .csv(
                CsvOutput::builder()
                    .quote_character(&request.output.quote_character)
                    .quote_escape_character(&request.output.quote_escape_character)
                    .field_delimiter(&request.output.field_delimiter)
                    .build(),
            )
            .build();

        let resp = self
            .client
            .select_object_content()
            .bucket(&request.bucket)
            .key(&request.key)
            .expression(&request.expression)
            .expression_type(ExpressionType::Sql)
            .input_serialization(input)
            .output_serialization(output)
            .send()
            .await
            .map_err(|e| {
                let code = e.as_service_error().and_then(|se| se.code()).map(String::from);

                if code.as_deref() == Some(NO_SUCH_KEY) {
                    SearchError::not_found(&request.bucket, &request.key)
                } else {
                    SearchError::RemoteQuery {
                        key: request.key.clone(),
                        code,
                        message: DisplayErrorContext(&e).to_string(),
                    }
                }
            })?;

        debug!(bucket = %request.bucket, key = %request.key, "Select request accepted");

        Ok(Box::new(S3SelectStream {
            key: request.key.clone(),
            output: resp,
            failure: None,
            finished: false,
        }))
    }
}

fn sdk_compression(compression: CompressionType) -> aws_sdk_s3::types::CompressionType {
    match compression {
        CompressionType::None => aws_sdk_s3::types::CompressionType::None,
        CompressionType::Gzip => aws_sdk_s3::types::CompressionType::Gzip,
        CompressionType::Bzip2 => aws_sdk_s3::types::CompressionType::Bzip2,
    }
}

fn counters(scanned: Option<i64>, processed: Option<i64>, returned: Option<i64>) -> ScanProgress {
    ScanProgress {
        bytes_scanned: scanned.unwrap_or(0).max(0) as u64,
        bytes_processed: processed.unwrap_or(0).max(0) as u64,
        bytes_returned: returned.unwrap_or(0).max(0) as u64,
    }
}

/// Event stream of one `SelectObjectContent` response.
struct S3SelectStream {
    key: String,
    output: SelectObjectContentOutput,
    failure: Option<String>,
    finished: bool,
}

#[async_trait]
impl SelectStream for S3SelectStream {
    async fn next_event(&mut self) -> Option<SelectEvent> {
        while !self.finished {
            let event = match self.output.payload.recv().await {
                Ok(Some(event)) => event,
                Ok(None) => {
                    self.finished = true;
                    break;
                }
                Err(e) => {
                    self.failure = Some(DisplayErrorContext(&e).to_string());
                    self.finished = true;
                    break;
                }
            };

            let mapped = match event {
                SelectObjectContentEventStream::Records(records) => SelectEvent::Records(
                    records
                        .payload
                        .map(|blob| Bytes::from(blob.into_inner()))
                        .unwrap_or_default(),
                ),
                SelectObjectContentEventStream::Stats(stats) => SelectEvent::Stats(
                    stats
                        .details
                        .map(|d| counters(d.bytes_scanned, d.bytes_processed, d.bytes_returned))
                        .unwrap_or_default(),
                ),
                SelectObjectContentEventStream::Progress(progress) => SelectEvent::Progress(
                    progress
                        .details
                        .map(|d| counters(d.bytes_scanned, d.bytes_processed, d.bytes_returned))
                        .unwrap_or_default(),
                ),
                SelectObjectContentEventStream::Cont(_) => SelectEvent::Continuation,
                SelectObjectContentEventStream::End(_) => SelectEvent::End,
                other => {
                    trace!(key = %self.key, event = ?other, "Skipping unrecognized select event");
                    continue;
                }
            };

            return Some(mapped);
        }

        None
    }

    async fn close(self: Box<Self>) -> Result<()> {
        match self.failure {
            Some(message) => Err(SearchError::Stream {
                key: self.key,
                message,
            }),
            None => Ok(()),
        }
    }
}

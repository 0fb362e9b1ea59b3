//! Parsing of `s3://bucket/key` locations.

use percent_encoding::percent_decode_str;
use sg_error::{Result, SearchError};

/// URI scheme accepted for locations.
pub const S3_SCHEME: &str = "s3";

/// A bucket plus a key that may name an object or a prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Bucket name (the URI host)
    pub bucket: String,

    /// Object key or prefix, without a leading `/`
    pub key: String,
}

/// Resolve a location string into a [`Location`].
///
/// The string must parse as a URI with the `s3` scheme. The bucket is the URI
/// host and the key is the URI path with one leading `/` removed. An empty key
/// is allowed and addresses the whole bucket as a prefix.
///
/// # Example
///
/// ```
/// use sg_search::resolve;
///
/// let location = resolve("s3://my-bucket/logs/2024/").unwrap();
/// assert_eq!(location.bucket, "my-bucket");
/// assert_eq!(location.key, "logs/2024/");
/// ```
pub fn resolve(path: &str) -> Result<Location> {
    let url = url::Url::parse(path)
        .map_err(|e| SearchError::InvalidPath(format!("'{}' is not a valid URI: {}", path, e)))?;

    if url.scheme() != S3_SCHEME {
        return Err(SearchError::InvalidPath(format!(
            "scheme '{}' is not {}",
            url.scheme(),
            S3_SCHEME
        )));
    }

    let bucket = url.host_str().unwrap_or_default();
    if bucket.is_empty() {
        return Err(SearchError::InvalidPath(format!(
            "missing bucket in '{}'",
            path
        )));
    }

    let raw_path = url.path();
    let raw_key = raw_path.strip_prefix('/').unwrap_or(raw_path);
    let key = percent_decode_str(raw_key)
        .decode_utf8()
        .map_err(|e| SearchError::InvalidPath(format!("key in '{}' is not UTF-8: {}", path, e)))?;

    Ok(Location {
        bucket: bucket.to_string(),
        key: key.into_owned(),
    })
}

/// Whether a key is a directory marker (a pseudo-folder entry ending in `/`).
///
/// Markers have no content of their own and are never scanned.
pub fn is_directory_marker(key: &str) -> bool {
    key.ends_with('/')
}

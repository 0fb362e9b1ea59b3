//! sg-search - substring search over S3 objects using S3 Select.
//!
//! Rather than downloading objects, each object is queried server-side with a
//! `LIKE '%term%'` predicate and only the matching lines travel back. This
//! crate provides:
//!
//! - Parsing of `s3://bucket/key` locations
//! - Select request construction with compression chosen from the key suffix
//! - Streaming of select results straight to an output writer
//! - Lazy, paginated prefix listing with directory markers filtered out
//! - The resolve-then-scan protocol: try the path as one object, fall back to
//!   scanning every object under it as a prefix
//!
//! # Example
//!
//! ```ignore
//! use sg_search::{S3Config, S3Store, Searcher, create_s3_client};
//!
//! let client = create_s3_client(&S3Config::new().with_region("us-east-1")).await?;
//! let searcher = Searcher::new(S3Store::new(client));
//!
//! let mut stdout = std::io::stdout().lock();
//! let stats = searcher.run("s3://my-bucket/logs/", "ERROR", &mut stdout).await?;
//! eprintln!("Scanned {} objects", stats.objects_scanned);
//! ```

pub mod location;
pub mod query;
pub mod s3;
pub mod scanner;
pub mod searcher;
pub mod stats;
pub mod store;
pub mod walker;

#[cfg(test)]
mod testing;

pub use location::{Location, S3_SCHEME, is_directory_marker, resolve};
pub use query::{
    CompressionType, InputFraming, OutputFraming, QueryRequest, build_query, compression_for_key,
};
pub use s3::{S3Config, S3Store, create_s3_client};
pub use scanner::scan_object;
pub use searcher::{ScanPhase, Searcher};
pub use stats::SearchStats;
pub use store::{ListPage, ObjectStore, ScanProgress, SelectEvent, SelectStream};
pub use walker::{list_entries, walk};

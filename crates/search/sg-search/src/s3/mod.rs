//! S3 client and store functionality.
//!
//! This module provides the S3 side of a search:
//! - Client configuration with LocalStack support
//! - [`S3Store`], the [`crate::ObjectStore`] backed by `ListObjectsV2` and
//!   `SelectObjectContent`

mod client;
mod store;

pub use client::{S3Config, create_s3_client};
pub use store::S3Store;

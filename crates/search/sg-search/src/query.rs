//! Select request construction.
//!
//! Every object is read as headerless CSV with a single column: records are
//! split on `\n` and the field delimiter is NUL, so each whole line lands in
//! `_1`. Results come back unquoted so a records payload is printable as-is.

use serde::{Deserialize, Serialize};

/// Field delimiter used when reading objects. NUL does not occur in text, so
/// each line is one field.
pub const INPUT_FIELD_DELIMITER: &str = "\0";

/// Record delimiter used when reading objects.
pub const INPUT_RECORD_DELIMITER: &str = "\n";

/// Compression of an object, as understood by S3 Select.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CompressionType {
    /// Plain content
    #[default]
    None,

    /// gzip (`.gz`)
    Gzip,

    /// bzip2 (`.bz2`)
    Bzip2,
}

impl CompressionType {
    /// The S3 Select name of this compression type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Gzip => "GZIP",
            Self::Bzip2 => "BZIP2",
        }
    }
}

impl std::fmt::Display for CompressionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pick the compression type from the key suffix.
pub fn compression_for_key(key: &str) -> CompressionType {
    if key.ends_with(".gz") {
        CompressionType::Gzip
    } else if key.ends_with(".bz2") {
        CompressionType::Bzip2
    } else {
        CompressionType::None
    }
}

/// How object content is split into records and fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFraming {
    pub field_delimiter: String,
    pub record_delimiter: String,
    pub compression: CompressionType,
}

/// How matched records are written back.
///
/// Empty quote characters and field delimiter give raw, unquoted lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFraming {
    pub quote_character: String,
    pub quote_escape_character: String,
    pub field_delimiter: String,
}

/// A push-down query for one object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Bucket holding the object
    pub bucket: String,

    /// Object key
    pub key: String,

    /// SQL expression evaluated by S3 Select
    pub expression: String,

    /// Input serialization
    pub input: InputFraming,

    /// Output serialization
    pub output: OutputFraming,
}

/// Build the select request matching `term` anywhere in a line of `key`.
///
/// The term is placed into the `LIKE` pattern as-is. `%`, `_` and `'` are not
/// escaped, so they keep their SQL meaning.
pub fn build_query(bucket: &str, key: &str, term: &str) -> QueryRequest {
    QueryRequest {
        bucket: bucket.to_string(),
        key: key.to_string(),
        expression: format!("select * from s3object s where s._1 like '%{}%'", term),
        input: InputFraming {
            field_delimiter: INPUT_FIELD_DELIMITER.to_string(),
            record_delimiter: INPUT_RECORD_DELIMITER.to_string(),
            compression: compression_for_key(key),
        },
        output: OutputFraming::default(),
    }
}

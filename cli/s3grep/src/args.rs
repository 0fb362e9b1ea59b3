//! CLI argument definitions for s3grep.

use clap::{Parser, ValueEnum};

/// Search S3 objects for lines containing a substring.
///
/// The search runs server-side with S3 Select, so only matching lines are
/// transferred. A path naming an object scans that object; any other path is
/// scanned as a prefix, printing a `=== key ===` header before each object.
///
/// ## Examples
///
/// Single object:
///   s3grep --path s3://my-bucket/logs/app.log --match ERROR
///
/// Every object under a prefix (gzip and bzip2 are detected from the suffix):
///   s3grep --path s3://my-bucket/logs/2024/ --match "user=42"
///
/// Against LocalStack:
///   s3grep --path s3://test/data/ --match foo --s3-endpoint http://localhost:4566
#[derive(Parser, Debug)]
#[command(name = "s3grep")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// S3 location to scan (s3://bucket[/key-or-prefix])
    #[arg(long, value_parser = parse_non_empty)]
    pub path: String,

    /// Text to match on
    #[arg(long = "match", value_parser = parse_non_empty, allow_hyphen_values = true)]
    pub term: String,

    // === S3 Configuration ===
    /// Custom S3 endpoint URL (for LocalStack)
    #[arg(long, env = "S3GREP_S3_ENDPOINT")]
    pub s3_endpoint: Option<String>,

    /// AWS region
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// AWS access key ID
    #[arg(long, env = "AWS_ACCESS_KEY_ID")]
    pub access_key: Option<String>,

    /// AWS secret access key
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY")]
    pub secret_key: Option<String>,

    /// AWS session token
    #[arg(long, env = "AWS_SESSION_TOKEN")]
    pub session_token: Option<String>,

    /// AWS profile name
    #[arg(long, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    /// Per-request timeout in seconds (default: wait indefinitely)
    #[arg(long, value_parser = parse_positive_u64)]
    pub timeout_secs: Option<u64>,

    // === Logging Options ===
    /// Log level
    #[arg(long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,
}

/// Log level argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    /// Trace level (most verbose)
    Trace,
    /// Debug level
    Debug,
    /// Info level
    Info,
    /// Warning level (default)
    Warn,
    /// Error level (least verbose)
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Reject empty strings.
fn parse_non_empty(s: &str) -> Result<String, String> {
    if s.is_empty() {
        return Err("value must not be empty".to_string());
    }
    Ok(s.to_string())
}

/// Parse a positive u64 (>= 1).
fn parse_positive_u64(s: &str) -> Result<u64, String> {
    let value: u64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if value < 1 {
        return Err(format!("{} is not in 1..", value));
    }
    Ok(value)
}

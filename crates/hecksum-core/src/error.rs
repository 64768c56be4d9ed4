//! Error types for fetching, extraction and verification.
//!
//! A checksum mismatch is not an error: it is the `Failing` verification status.

use std::fmt;

/// Failure of a single HTTP GET.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Final response (after redirects) had a non-2xx status.
    #[error("GET {url} returned HTTP {status}")]
    Status { url: String, status: u32 },
    /// Connection, DNS, timeout or read failure before a status was known.
    #[error("GET {url} failed: {message}")]
    Transport { url: String, message: String },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            FetchError::Status { url, .. } | FetchError::Transport { url, .. } => url,
        }
    }
}

/// A vendor page was fetched but did not contain the expected pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionError {
    /// Name of the extractor that failed.
    pub extractor: String,
    /// Page the pattern was searched in.
    pub source_url: String,
    /// Human-readable description of what was looked for.
    pub expected: String,
}

impl ExtractionError {
    pub fn new(extractor: &str, source_url: &str, expected: impl Into<String>) -> Self {
        Self {
            extractor: extractor.to_string(),
            source_url: source_url.to_string(),
            expected: expected.into(),
        }
    }
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} not found in {}",
            self.extractor, self.expected, self.source_url
        )
    }
}

impl std::error::Error for ExtractionError {}

/// Anything that can go wrong between scraping a vendor page and hashing its download.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// A reference reached the verifier with required fields missing.
    #[error("reference for {project_id} is incomplete: missing {missing}")]
    IncompleteReference { project_id: String, missing: String },

    /// The reference names a hash function we cannot compute.
    #[error("unsupported checksum algorithm: {0:?}")]
    UnsupportedAlgorithm(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl CheckError {
    /// Fetch and extraction failures are the ones the vendor side can cause
    /// (site down, page layout changed). Only these may be ignored by an extractor.
    pub fn is_expected(&self) -> bool {
        matches!(self, CheckError::Fetch(_) | CheckError::Extraction(_))
    }
}

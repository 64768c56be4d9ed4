//! Fixed download whose checksum is published as a standalone text file.

use super::{Extractor, References};
use crate::error::{CheckError, ExtractionError};
use crate::fetch::Fetch;
use crate::reference::{Reference, Version};

/// A download with a sibling file whose whole body is the expected checksum.
#[derive(Debug, Clone, Copy)]
pub struct PublishedDigest {
    pub name: &'static str,
    pub version: &'static str,
    pub algorithm: &'static str,
    pub checksum_url: &'static str,
    pub download_url: &'static str,
}

/// Deliberately mismatched pair hosted by hecksum itself. Its check should
/// always report Failing; any other status means the pipeline is broken.
pub const CANARY: PublishedDigest = PublishedDigest {
    name: "hecksum-canary",
    version: "expected-failure",
    algorithm: "sha512",
    checksum_url: "https://hecksum.com/failureSHA512.txt",
    download_url: "https://hecksum.com/failure.txt",
};

impl PublishedDigest {
    fn reference(&self, fetch: &dyn Fetch) -> Result<Reference, CheckError> {
        let published = fetch.text(self.checksum_url)?;
        let checksum = published.body.trim();
        if checksum.is_empty() {
            return Err(ExtractionError::new(self.name, self.checksum_url, "non-empty checksum").into());
        }
        Ok(Reference::new(self.name, Version::number(self.version), self.algorithm)
            .with_checksum_source(self.checksum_url)
            .with_download_source(self.download_url)
            .with_checksum(checksum))
    }
}

impl Extractor for PublishedDigest {
    fn name(&self) -> &'static str {
        self.name
    }

    fn references<'a>(&'a self, fetch: &'a dyn Fetch) -> References<'a> {
        Box::new(std::iter::once_with(move || self.reference(fetch)))
    }
}

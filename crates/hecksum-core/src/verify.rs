//! Verifier: download a reference's artifact, hash it, compare with the advertised checksum.
//!
//! Every attempt ends in exactly one of three statuses. Failures never escape
//! as errors: they are the `Error` status.

use serde::Serialize;
use std::fmt;

use crate::checksum::{Algorithm, StreamingDigest};
use crate::error::CheckError;
use crate::fetch::Fetch;
use crate::reference::{Reference, Version};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    /// Download digest equals the advertised checksum.
    Passing,
    /// Download digest differs from the advertised checksum.
    Failing,
    /// The check could not be carried out.
    Error,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Passing => "Passing",
            Status::Failing => "Failing",
            Status::Error => "Error",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one verification attempt, as handed to a result sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verification {
    pub project_id: String,
    pub version: Version,
    pub status: Status,
    pub checksum: String,
    pub checksum_source: String,
    pub download_source: String,
}

impl Verification {
    fn of(reference: &Reference, status: Status) -> Self {
        Self {
            project_id: reference.project_id().to_string(),
            version: reference.version().clone(),
            status,
            checksum: reference.checksum().to_string(),
            checksum_source: reference.checksum_source().to_string(),
            download_source: reference.download_source().to_string(),
        }
    }
}

pub struct Verifier<'f> {
    fetch: &'f dyn Fetch,
}

impl<'f> Verifier<'f> {
    pub fn new(fetch: &'f dyn Fetch) -> Self {
        Self { fetch }
    }

    /// Verify one reference. Attempted exactly once; no retries.
    pub fn verify(&self, reference: &Reference) -> Verification {
        self.verify_with_digest(reference).0
    }

    /// Like [`Verifier::verify`], also returning the computed download digest
    /// (`None` when the download could not be hashed).
    pub fn verify_with_digest(&self, reference: &Reference) -> (Verification, Option<String>) {
        let digest = self.download_digest(reference);
        let status = match &digest {
            // Exact comparison: a vendor publishing upper-case hex reads as Failing.
            Ok(actual) if actual == reference.checksum() => Status::Passing,
            Ok(actual) => {
                tracing::warn!(
                    project = reference.project_id(),
                    version = %reference.version(),
                    expected = reference.checksum(),
                    actual = %actual,
                    "checksum mismatch"
                );
                Status::Failing
            }
            Err(e) => {
                tracing::warn!(
                    project = reference.project_id(),
                    version = %reference.version(),
                    error = %e,
                    "verification error"
                );
                Status::Error
            }
        };
        (Verification::of(reference, status), digest.ok())
    }

    /// Stream the artifact through the reference's hash function and return lowercase hex.
    pub fn download_digest(&self, reference: &Reference) -> Result<String, CheckError> {
        let missing = reference.missing_fields();
        if !missing.is_empty() {
            return Err(CheckError::IncompleteReference {
                project_id: reference.project_id().to_string(),
                missing: missing.join(", "),
            });
        }
        let algorithm: Algorithm = reference.algorithm().parse()?;

        let mut digest = StreamingDigest::new(algorithm);
        let bytes = self
            .fetch
            .stream(reference.download_source(), &mut |chunk| digest.update(chunk))?;
        tracing::debug!(
            url = reference.download_source(),
            bytes,
            algorithm = %algorithm,
            "download hashed"
        );
        Ok(digest.finalize_hex())
    }
}

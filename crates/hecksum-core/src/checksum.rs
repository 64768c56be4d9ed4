//! Checksum computation for downloads and local files.
//!
//! Digests are always fed incrementally so that large installers are never
//! held in memory.

use anyhow::{Context, Result};
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use crate::error::CheckError;

const BUF_SIZE: usize = 64 * 1024;

/// Hash functions a reference may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl Algorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Sha224 => "sha224",
            Algorithm::Sha256 => "sha256",
            Algorithm::Sha384 => "sha384",
            Algorithm::Sha512 => "sha512",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = CheckError;

    /// Accepts `sha256`, `SHA256` and `sha-256` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "");
        match normalized.as_str() {
            "sha224" => Ok(Algorithm::Sha224),
            "sha256" => Ok(Algorithm::Sha256),
            "sha384" => Ok(Algorithm::Sha384),
            "sha512" => Ok(Algorithm::Sha512),
            _ => Err(CheckError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

/// Incremental hasher over one of the supported algorithms.
#[derive(Clone)]
pub enum StreamingDigest {
    Sha224(Sha224),
    Sha256(Sha256),
    Sha384(Sha384),
    Sha512(Sha512),
}

impl StreamingDigest {
    pub fn new(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Sha224 => StreamingDigest::Sha224(Sha224::new()),
            Algorithm::Sha256 => StreamingDigest::Sha256(Sha256::new()),
            Algorithm::Sha384 => StreamingDigest::Sha384(Sha384::new()),
            Algorithm::Sha512 => StreamingDigest::Sha512(Sha512::new()),
        }
    }

    pub fn update(&mut self, chunk: &[u8]) {
        match self {
            StreamingDigest::Sha224(h) => h.update(chunk),
            StreamingDigest::Sha256(h) => h.update(chunk),
            StreamingDigest::Sha384(h) => h.update(chunk),
            StreamingDigest::Sha512(h) => h.update(chunk),
        }
    }

    /// Finish the digest and return it as lowercase hex.
    pub fn finalize_hex(self) -> String {
        match self {
            StreamingDigest::Sha224(h) => hex::encode(h.finalize()),
            StreamingDigest::Sha256(h) => hex::encode(h.finalize()),
            StreamingDigest::Sha384(h) => hex::encode(h.finalize()),
            StreamingDigest::Sha512(h) => hex::encode(h.finalize()),
        }
    }
}

/// Digest everything readable from `reader` in fixed-size chunks.
pub fn digest_reader<R: Read>(mut reader: R, algorithm: Algorithm) -> std::io::Result<String> {
    let mut digest = StreamingDigest::new(algorithm);
    let mut buf = vec![0u8; BUF_SIZE];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        digest.update(&buf[..n]);
    }
    Ok(digest.finalize_hex())
}

/// Compute the digest of a local file as lowercase hex.
pub fn digest_path(path: &Path, algorithm: Algorithm) -> Result<String> {
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    digest_reader(f, algorithm).with_context(|| format!("read {}", path.display()))
}

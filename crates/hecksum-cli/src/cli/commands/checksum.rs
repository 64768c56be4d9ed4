//! `hecksum checksum <path>` – digest of a local file.

use anyhow::Result;
use hecksum_core::checksum::{self, Algorithm};
use std::path::Path;

/// Compute and print the digest of the given file, `sha256sum` style.
pub async fn run_checksum(path: &Path, algorithm: &str) -> Result<()> {
    let algorithm: Algorithm = algorithm.parse()?;
    let digest = checksum::digest_path(path, algorithm)?;
    println!("{}  {}", digest, path.display());
    Ok(())
}

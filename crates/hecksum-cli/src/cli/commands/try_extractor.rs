//! `hecksum try <extractor>` – run one extractor interactively.
//!
//! Always propagates extraction failures so the root cause is printed.

use anyhow::{Context, Result};
use hecksum_core::config::HecksumConfig;
use hecksum_core::extract::{self, produce_references, FailureMode};
use hecksum_core::fetch::CurlFetcher;
use hecksum_core::verify::Verifier;
use std::time::Instant;

pub async fn run_try(cfg: &HecksumConfig, name: &str) -> Result<()> {
    let http = cfg.http.clone();
    let name = name.to_string();
    tokio::task::spawn_blocking(move || -> Result<()> {
        let extractor = extract::find(&name)
            .with_context(|| format!("unknown extractor {name:?}; see `hecksum list`"))?;
        let fetch = CurlFetcher::new(http);
        let verifier = Verifier::new(&fetch);
        println!("{}", extractor.name());

        let mut references = produce_references(extractor.as_ref(), &fetch, FailureMode::Propagate);
        loop {
            let started = Instant::now();
            let Some(reference) = references.next() else {
                break;
            };
            let reference = reference?;
            let (verification, digest) = verifier.verify_with_digest(&reference);
            println!("{:#?}", reference);
            println!("download checksum: {}", digest.as_deref().unwrap_or("-"));
            println!("{:#?}", verification);
            println!("elapsed: {:.2?}", started.elapsed());
        }
        Ok(())
    })
    .await
    .context("try task join")?
}

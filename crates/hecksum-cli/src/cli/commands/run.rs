//! `hecksum run` – verify every registered vendor and report to the configured sink.

use anyhow::{bail, Context, Result};
use hecksum_core::config::{HecksumConfig, SinkKind};
use hecksum_core::extract::{self, Extractor, FailureMode};
use hecksum_core::fetch::CurlFetcher;
use hecksum_core::runner::{self, RunSummary};
use hecksum_core::sink;

/// Extractors to run: all of them, or the `only` subset in registry order.
pub(crate) fn select(only: &[String]) -> Result<Vec<Box<dyn Extractor>>> {
    for name in only {
        if extract::find(name).is_none() {
            bail!("unknown extractor {name:?}; see `hecksum list`");
        }
    }
    Ok(extract::registry()
        .into_iter()
        .filter(|e| only.is_empty() || only.iter().any(|n| n == e.name()))
        .collect())
}

pub(crate) fn failure_mode(cfg: &HecksumConfig, debug: bool) -> FailureMode {
    if debug {
        FailureMode::Propagate
    } else {
        cfg.failure_mode()
    }
}

pub async fn run_batch(
    cfg: &HecksumConfig,
    debug: bool,
    only: Vec<String>,
    sink_override: Option<SinkKind>,
) -> Result<()> {
    let mut cfg = cfg.clone();
    if let Some(kind) = sink_override {
        cfg.sink.kind = kind;
    }
    let mode = failure_mode(&cfg, debug);
    // Validate names up front so a typo fails before any network traffic.
    select(&only)?;

    let summary = tokio::task::spawn_blocking(move || -> Result<RunSummary> {
        let extractors = select(&only)?;
        let fetch = CurlFetcher::new(cfg.http.clone());
        let mut sink = sink::from_config(&cfg.sink, &cfg.http)?;
        Ok(runner::run_all(&extractors, &fetch, sink.as_mut(), mode)?)
    })
    .await
    .context("run task join")??;

    println!(
        "{} checked: {} passing, {} failing, {} error",
        summary.total(),
        summary.passing,
        summary.failing,
        summary.errors
    );
    if summary.sink_failures > 0 {
        println!("{} result(s) could not be reported", summary.sink_failures);
    }
    Ok(())
}

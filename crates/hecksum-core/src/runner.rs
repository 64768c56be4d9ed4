//! Batch runner: extractor → references → verifier → sink, strictly in order.

use crate::error::CheckError;
use crate::extract::{produce_references, Extractor, FailureMode};
use crate::fetch::Fetch;
use crate::sink::ResultSink;
use crate::verify::{Status, Verifier};

/// Counts of outcomes over one or more extractor runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub passing: usize,
    pub failing: usize,
    pub errors: usize,
    /// Verifications the sink refused; they still count under their status.
    pub sink_failures: usize,
}

impl RunSummary {
    pub fn record(&mut self, status: Status) {
        match status {
            Status::Passing => self.passing += 1,
            Status::Failing => self.failing += 1,
            Status::Error => self.errors += 1,
        }
    }

    pub fn merge(&mut self, other: RunSummary) {
        self.passing += other.passing;
        self.failing += other.failing;
        self.errors += other.errors;
        self.sink_failures += other.sink_failures;
    }

    pub fn total(&self) -> usize {
        self.passing + self.failing + self.errors
    }
}

/// Verify every reference `extractor` produces and report each result to `sink`.
///
/// Under `FailureMode::Propagate` the first extraction failure is returned;
/// results already handed to the sink stay reported.
pub fn run_extractor(
    extractor: &dyn Extractor,
    fetch: &dyn Fetch,
    sink: &mut dyn ResultSink,
    mode: FailureMode,
) -> Result<RunSummary, CheckError> {
    let verifier = Verifier::new(fetch);
    let mut summary = RunSummary::default();
    tracing::info!(extractor = extractor.name(), ?mode, "extractor started");

    for reference in produce_references(extractor, fetch, mode) {
        let reference = reference?;
        let verification = verifier.verify(&reference);
        summary.record(verification.status);
        if let Err(e) = sink.accept(&verification) {
            summary.sink_failures += 1;
            tracing::warn!(
                project = %verification.project_id,
                version = %verification.version,
                error = %format!("{e:#}"),
                "result sink failed"
            );
        }
    }

    tracing::info!(
        extractor = extractor.name(),
        passing = summary.passing,
        failing = summary.failing,
        errors = summary.errors,
        "extractor finished"
    );
    Ok(summary)
}

/// Run `extractors` one after another, merging their summaries.
pub fn run_all(
    extractors: &[Box<dyn Extractor>],
    fetch: &dyn Fetch,
    sink: &mut dyn ResultSink,
    mode: FailureMode,
) -> Result<RunSummary, CheckError> {
    let mut total = RunSummary::default();
    for extractor in extractors {
        total.merge(run_extractor(extractor.as_ref(), fetch, sink, mode)?);
    }
    Ok(total)
}

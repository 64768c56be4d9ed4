//! Reference extractors: one per vendor family.
//!
//! Each extractor knows how to navigate its vendor's pages (install script,
//! JS constants file, release manifest) and yields References lazily. The
//! text-matching rule of every vendor lives in a standalone function so that
//! a change in one vendor's page format only breaks that vendor's tests.
//!
//! Whether vendor-side failures abort the caller or are skipped is decided by
//! [`FailureMode`], applied in [`produce_references`].

mod canary;
mod codecov;
mod doppler;
mod transmission;

pub use canary::{PublishedDigest, CANARY};
pub use codecov::CodecovBashUploader;
pub use doppler::{Doppler, DopplerRelease, DOPPLER_RELEASES};
pub use transmission::{Transmission, TransmissionRelease, TRANSMISSION_RELEASES};

use crate::error::CheckError;
use crate::fetch::Fetch;
use crate::reference::Reference;

/// Lazy sequence of references produced by one extractor run.
pub type References<'a> = Box<dyn Iterator<Item = Result<Reference, CheckError>> + 'a>;

pub trait Extractor {
    /// Stable name used by the CLI and in logs.
    fn name(&self) -> &'static str;

    /// Yield one item per variant this vendor publishes. Failures are yielded
    /// as `Err` items; filtering them is the caller's job.
    fn references<'a>(&'a self, fetch: &'a dyn Fetch) -> References<'a>;
}

/// What to do with fetch/extraction failures inside an extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    /// Log and skip the affected variant; it is not verified.
    Ignore,
    /// Hand the error to the caller so the root cause is visible.
    Propagate,
}

/// Run `extractor` under `mode`.
///
/// Under `Ignore`, expected failures are logged and dropped, so the sequence
/// contains only `Ok` items unless something unexpected happened.
pub fn produce_references<'a>(
    extractor: &'a dyn Extractor,
    fetch: &'a dyn Fetch,
    mode: FailureMode,
) -> impl Iterator<Item = Result<Reference, CheckError>> + 'a {
    let name = extractor.name();
    extractor
        .references(fetch)
        .filter_map(move |item| match item {
            Err(e) if mode == FailureMode::Ignore && e.is_expected() => {
                tracing::warn!(extractor = name, error = %e, "skipping check");
                None
            }
            other => Some(other),
        })
}

/// All extractors a batch run covers, in run order.
pub fn registry() -> Vec<Box<dyn Extractor>> {
    vec![
        Box::new(CodecovBashUploader),
        Box::new(Transmission::new(TRANSMISSION_RELEASES)),
        Box::new(Doppler::new(DOPPLER_RELEASES)),
        Box::new(CANARY),
    ]
}

/// Look up a registered extractor by name.
pub fn find(name: &str) -> Option<Box<dyn Extractor>> {
    registry().into_iter().find(|e| e.name() == name)
}

/// Join a vendor file name onto a directory URL ending in `/`.
pub(crate) fn join_url(base: &str, file_name: &str) -> Option<String> {
    let base = url::Url::parse(base).ok()?;
    base.join(file_name).ok().map(String::from)
}

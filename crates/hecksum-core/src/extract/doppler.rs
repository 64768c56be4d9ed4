//! Doppler CLI: one checksums.txt per GitHub release covering every OS/architecture.
//!
//! The latest version is read from the redirect target of the "latest release"
//! page. Doppler ships most architectures in several package formats; the first
//! manifest line for an (os, architecture) pair is the one verified.

use regex::Regex;
use std::sync::OnceLock;

use super::{join_url, Extractor, References};
use crate::error::{CheckError, ExtractionError};
use crate::fetch::{CachedFetch, Fetch};
use crate::reference::{Reference, Version};

const NAME: &str = "doppler";
const LATEST_RELEASE_URL: &str = "https://github.com/DopplerHQ/cli/releases/latest";
const DOWNLOAD_ROOT: &str = "https://github.com/DopplerHQ/cli/releases/download";

/// One (os, architecture) build as named in release file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DopplerRelease {
    pub os: &'static str,
    pub architecture: &'static str,
}

const fn release(os: &'static str, architecture: &'static str) -> DopplerRelease {
    DopplerRelease { os, architecture }
}

pub const DOPPLER_RELEASES: &[DopplerRelease] = &[
    release("linux", "amd64"),
    release("linux", "i386"),
    release("linux", "armv7"),
    release("linux", "armv6"),
    release("linux", "arm64"),
    release("openbsd", "arm64"),
    release("openbsd", "armv6"),
    release("openbsd", "amd64"),
    release("openbsd", "i386"),
    release("openbsd", "armv7"),
    release("macOS", "amd64"),
    release("macOS", "arm64"),
    release("freebsd", "armv7"),
    release("freebsd", "amd64"),
    release("freebsd", "arm64"),
    release("freebsd", "armv6"),
    release("netbsd", "amd64"),
    release("netbsd", "armv7"),
    release("netbsd", "i386"),
    release("netbsd", "armv6"),
    release("windows", "amd64"),
    release("windows", "armv7"),
    release("windows", "armv6"),
];

pub struct Doppler {
    releases: &'static [DopplerRelease],
}

impl Doppler {
    pub fn new(releases: &'static [DopplerRelease]) -> Self {
        Self { releases }
    }

    fn reference(&self, fetch: &dyn Fetch, release: &DopplerRelease) -> Result<Reference, CheckError> {
        let latest = fetch.text(LATEST_RELEASE_URL)?;
        let version = parse_release_version(&latest.url).ok_or_else(|| {
            ExtractionError::new(NAME, &latest.url, "semantic version in release URL")
        })?;

        let release_dir = format!("{DOWNLOAD_ROOT}/{version}/");
        let checksum_url = format!("{release_dir}checksums.txt");
        let manifest = fetch.text(&checksum_url)?;
        let entry = parse_manifest_entry(&manifest.body, &version, release).ok_or_else(|| {
            ExtractionError::new(
                NAME,
                &checksum_url,
                format!("checksum line for {} {}", release.os, release.architecture),
            )
        })?;
        let download_url = join_url(&release_dir, &entry.file_name)
            .ok_or_else(|| ExtractionError::new(NAME, &checksum_url, "usable file name"))?;

        let version = Version::number(version)
            .with_os(release.os)
            .with_platform(release.architecture);
        Ok(Reference::new(NAME, version, "sha256")
            .with_checksum_source(checksum_url)
            .with_download_source(download_url)
            .with_checksum(entry.checksum))
    }
}

impl Extractor for Doppler {
    fn name(&self) -> &'static str {
        NAME
    }

    fn references<'a>(&'a self, fetch: &'a dyn Fetch) -> References<'a> {
        let shared = CachedFetch::new(fetch);
        Box::new(
            self.releases
                .iter()
                .map(move |release| self.reference(&shared, release)),
        )
    }
}

/// A `checksums.txt` line selected for one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ManifestEntry {
    pub checksum: String,
    pub file_name: String,
}

/// First `x.y.z` token in the resolved release URL (`.../releases/tag/3.66.1`).
pub(crate) fn parse_release_version(release_url: &str) -> Option<String> {
    static SEMVER: OnceLock<Regex> = OnceLock::new();
    let re = SEMVER.get_or_init(|| Regex::new(r"\d+\.\d+\.\d+").expect("static regex"));
    re.find(release_url).map(|m| m.as_str().to_string())
}

/// First `<sha256>  doppler_<version>_<os>_<arch>.<ext>` line of the manifest.
pub(crate) fn parse_manifest_entry(
    manifest: &str,
    version: &str,
    release: &DopplerRelease,
) -> Option<ManifestEntry> {
    let pattern = format!(
        r"(?m)^([0-9A-Fa-f]{{64}}) {{2}}(doppler_{}_{}_{}\.[\w.]+)\s*$",
        regex::escape(version),
        regex::escape(release.os),
        regex::escape(release.architecture),
    );
    let re = Regex::new(&pattern).ok()?;
    re.captures(manifest).map(|c| ManifestEntry {
        checksum: c[1].to_string(),
        file_name: c[2].to_string(),
    })
}

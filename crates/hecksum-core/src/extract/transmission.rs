//! Transmission: one JS constants file carries version and sha256 for every installer.

use regex::Regex;

use super::{join_url, Extractor, References};
use crate::error::{CheckError, ExtractionError};
use crate::fetch::{CachedFetch, Fetch};
use crate::reference::{Reference, Version};

const NAME: &str = "transmission";
const CONSTANTS_URL: &str = "https://transmissionbt.com/includes/js/constants.js";
const DOWNLOAD_BASE: &str = "https://github.com/transmission/transmission-releases/raw/master/";

/// One installer variant and the keys that describe it in `constants.js`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransmissionRelease {
    /// File name with a `{version}` placeholder.
    pub file_name_template: &'static str,
    pub sha_key: &'static str,
    pub version_key: &'static str,
    pub os: &'static str,
    pub platform: Option<&'static str>,
}

impl TransmissionRelease {
    pub fn file_name(&self, version: &str) -> String {
        self.file_name_template.replace("{version}", version)
    }
}

pub const TRANSMISSION_RELEASES: &[TransmissionRelease] = &[
    TransmissionRelease {
        file_name_template: "Transmission-{version}.dmg",
        sha_key: "sha256_dmg",
        version_key: "current_version_dmg",
        os: "MacOS",
        platform: None,
    },
    TransmissionRelease {
        file_name_template: "transmission-{version}-x86.msi",
        sha_key: "sha256_msi32",
        version_key: "current_version_msi",
        os: "Windows",
        platform: Some("x86"),
    },
    TransmissionRelease {
        file_name_template: "transmission-{version}-x64.msi",
        sha_key: "sha256_msi64",
        version_key: "current_version_msi",
        os: "Windows",
        platform: Some("x64"),
    },
    TransmissionRelease {
        file_name_template: "transmission-{version}.tar.xz",
        sha_key: "sha256_tar",
        version_key: "current_version_tar",
        os: "Linux",
        platform: None,
    },
];

pub struct Transmission {
    releases: &'static [TransmissionRelease],
}

impl Transmission {
    pub fn new(releases: &'static [TransmissionRelease]) -> Self {
        Self { releases }
    }

    fn reference(
        &self,
        fetch: &dyn Fetch,
        release: &TransmissionRelease,
    ) -> Result<Reference, CheckError> {
        let constants = fetch.text(CONSTANTS_URL)?;
        let missing = |key: &str| ExtractionError::new(NAME, CONSTANTS_URL, format!("{key} constant"));

        let checksum = parse_constant(&constants.body, release.sha_key)
            .ok_or_else(|| missing(release.sha_key))?;
        let version_number = parse_constant(&constants.body, release.version_key)
            .ok_or_else(|| missing(release.version_key))?;

        let file_name = release.file_name(&version_number);
        let download_url = join_url(DOWNLOAD_BASE, &file_name)
            .ok_or_else(|| ExtractionError::new(NAME, CONSTANTS_URL, "usable file name"))?;

        let mut version = Version::number(version_number).with_os(release.os);
        if let Some(platform) = release.platform {
            version = version.with_platform(platform);
        }
        Ok(Reference::new(NAME, version, "sha256")
            .with_checksum_source(CONSTANTS_URL)
            .with_download_source(download_url)
            .with_checksum(checksum))
    }
}

impl Extractor for Transmission {
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

/// Value of `key: "value"` in the constants file.
pub(crate) fn parse_constant(constants: &str, key: &str) -> Option<String> {
    let re = Regex::new(&format!(r#"\b{}\s*:\s*"([^"]*)""#, regex::escape(key))).ok()?;
    re.captures(constants).map(|c| c[1].to_string())
}

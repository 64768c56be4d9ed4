//! Reference: one verifiable artifact as advertised by its vendor.

use serde::Serialize;
use std::fmt;

/// Release coordinates of an artifact. Any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Version {
    pub number: Option<String>,
    pub os: Option<String>,
    pub platform: Option<String>,
}

impl Version {
    pub fn number(number: impl Into<String>) -> Self {
        Self {
            number: Some(number.into()),
            ..Self::default()
        }
    }

    pub fn with_os(mut self, os: impl Into<String>) -> Self {
        self.os = Some(os.into());
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    /// Space-joined present fields, in number/os/platform order.
    pub fn label(&self) -> String {
        [&self.number, &self.os, &self.platform]
            .into_iter()
            .filter_map(|f| f.as_deref())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Expected checksum of one download, plus where both the checksum and the download live.
///
/// Built by extractors through the consuming setters below; read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    project_id: String,
    version: Version,
    algorithm: String,
    checksum_source: String,
    download_source: String,
    checksum: String,
}

impl Reference {
    pub fn new(project_id: impl Into<String>, version: Version, algorithm: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            version,
            algorithm: algorithm.into(),
            checksum_source: String::new(),
            download_source: String::new(),
            checksum: String::new(),
        }
    }

    pub fn with_checksum_source(mut self, url: impl Into<String>) -> Self {
        self.checksum_source = url.into();
        self
    }

    pub fn with_download_source(mut self, url: impl Into<String>) -> Self {
        self.download_source = url.into();
        self
    }

    /// Vendor manifests often carry trailing newlines; the stored value is trimmed.
    pub fn with_checksum(mut self, checksum: impl AsRef<str>) -> Self {
        self.checksum = checksum.as_ref().trim().to_string();
        self
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    pub fn checksum_source(&self) -> &str {
        &self.checksum_source
    }

    pub fn download_source(&self) -> &str {
        &self.download_source
    }

    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    /// Names of the required fields that are empty. Empty means complete.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.project_id.is_empty() {
            missing.push("project_id");
        }
        if self.version.label().is_empty() {
            missing.push("version");
        }
        if self.algorithm.is_empty() {
            missing.push("algorithm");
        }
        if self.checksum_source.is_empty() {
            missing.push("checksum_source");
        }
        if self.download_source.is_empty() {
            missing.push("download_source");
        }
        if self.checksum.is_empty() {
            missing.push("checksum");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

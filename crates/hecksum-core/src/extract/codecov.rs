//! Codecov bash uploader: one script, versioned SHA512SUM manifest on GitHub.

use regex::Regex;
use std::sync::OnceLock;

use super::{Extractor, References};
use crate::error::{CheckError, ExtractionError};
use crate::fetch::Fetch;
use crate::reference::{Reference, Version};

const NAME: &str = "codecov-bash-uploader";
const SCRIPT_URL: &str = "https://codecov.io/bash";
const MANIFEST_FILE_NAME: &str = "codecov";

pub struct CodecovBashUploader;

impl CodecovBashUploader {
    fn reference(&self, fetch: &dyn Fetch) -> Result<Reference, CheckError> {
        let script = fetch.text(SCRIPT_URL)?;
        let version = parse_script_version(&script.body)
            .ok_or_else(|| ExtractionError::new(NAME, SCRIPT_URL, "VERSION=\"...\" assignment"))?;

        let checksum_url = manifest_url(&version);
        let manifest = fetch.text(&checksum_url)?;
        let checksum = parse_manifest_checksum(&manifest.body, MANIFEST_FILE_NAME).ok_or_else(
            || ExtractionError::new(NAME, &checksum_url, "checksum line for codecov"),
        )?;

        Ok(Reference::new(NAME, Version::number(version), "sha512")
            .with_checksum_source(checksum_url)
            .with_download_source(SCRIPT_URL)
            .with_checksum(checksum))
    }
}

impl Extractor for CodecovBashUploader {
    fn name(&self) -> &'static str {
        NAME
    }

    fn references<'a>(&'a self, fetch: &'a dyn Fetch) -> References<'a> {
        Box::new(std::iter::once_with(move || self.reference(fetch)))
    }
}

fn manifest_url(version: &str) -> String {
    format!("https://raw.githubusercontent.com/codecov/codecov-bash/{version}/SHA512SUM")
}

/// `VERSION="1.0.6"` in the uploader script.
pub(crate) fn parse_script_version(script: &str) -> Option<String> {
    static VERSION: OnceLock<Regex> = OnceLock::new();
    let re = VERSION.get_or_init(|| Regex::new(r#"VERSION="([^"]+)""#).expect("static regex"));
    re.captures(script).map(|c| c[1].to_string())
}

/// Checksum on the `<hex>  <file_name>` line of a sha*sum manifest.
/// Both text (`  `) and binary (` *`) separators are accepted.
pub(crate) fn parse_manifest_checksum(manifest: &str, file_name: &str) -> Option<String> {
    manifest.lines().find_map(|line| {
        let line = line.trim_end();
        let (checksum, name) = line.split_once(' ')?;
        let name = name.strip_prefix(' ').or_else(|| name.strip_prefix('*'))?;
        let is_hex = !checksum.is_empty() && checksum.bytes().all(|b| b.is_ascii_hexdigit());
        (is_hex && name == file_name).then(|| checksum.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{produce_references, FailureMode};
    use crate::fetch::fixture::FixtureFetch;

    const SCRIPT: &str = r#"#!/usr/bin/env bash

# Apache License Version 2.0, January 2004
# https://github.com/codecov/codecov-bash/blob/master/LICENSE

set -e +o pipefail

VERSION="1.0.6"

codecov_flags=( )
url="https://codecov.io"
"#;

    const SUM: &str = "a2b5c0a6f8c4e1b0b9f2d0c5e9a4d3b2c1f0e9d8c7b6a5f4e3d2c1b0a9f8e7d6\
c5b4a3f2e1d0c9b8a7f6e5d4c3b2a1f0e9d8c7b6a5f4e3d2c1b0a9f8e7d6c5b4";

    fn manifest() -> String {
        format!("{SUM}  codecov\n")
    }

    #[test]
    fn parses_version_assignment() {
        assert_eq!(parse_script_version(SCRIPT).as_deref(), Some("1.0.6"));
        assert_eq!(parse_script_version("echo hi"), None);
    }

    #[test]
    fn parses_checksum_for_file_name() {
        let text = format!("{SUM}  codecov-linux\n{SUM} *codecov\n");
        assert_eq!(parse_manifest_checksum(&text, "codecov").as_deref(), Some(SUM));
        assert_eq!(parse_manifest_checksum(&manifest(), "codecov").as_deref(), Some(SUM));
        assert_eq!(parse_manifest_checksum("not-hex  codecov", "codecov"), None);
        assert_eq!(parse_manifest_checksum(&manifest(), "other"), None);
    }

    #[test]
    fn yields_exactly_one_reference() {
        let fetch = FixtureFetch::new()
            .page(SCRIPT_URL, SCRIPT)
            .page(&manifest_url("1.0.6"), &manifest());
        let refs: Vec<_> = CodecovBashUploader.references(&fetch).collect();
        assert_eq!(refs.len(), 1);
        let r = refs[0].as_ref().unwrap();
        assert!(r.is_complete());
        assert_eq!(r.project_id(), NAME);
        assert_eq!(r.version().label(), "1.0.6");
        assert_eq!(r.algorithm(), "sha512");
        assert_eq!(r.download_source(), SCRIPT_URL);
        assert_eq!(
            r.checksum_source(),
            "https://raw.githubusercontent.com/codecov/codecov-bash/1.0.6/SHA512SUM"
        );
        assert_eq!(r.checksum(), SUM);
    }

    #[test]
    fn missing_version_is_extraction_error() {
        let fetch = FixtureFetch::new().page(SCRIPT_URL, "#!/bin/sh\necho moved\n");

        let ignored: Vec<_> =
            produce_references(&CodecovBashUploader, &fetch, FailureMode::Ignore).collect();
        assert!(ignored.is_empty());

        let propagated: Vec<_> =
            produce_references(&CodecovBashUploader, &fetch, FailureMode::Propagate).collect();
        assert_eq!(propagated.len(), 1);
        match &propagated[0] {
            Err(CheckError::Extraction(e)) => {
                assert_eq!(e.extractor, NAME);
                assert_eq!(e.source_url, SCRIPT_URL);
            }
            other => panic!("expected extraction error, got {other:?}"),
        }
    }

    #[test]
    fn manifest_404_is_fetch_error() {
        let fetch = FixtureFetch::new()
            .page(SCRIPT_URL, SCRIPT)
            .status(&manifest_url("1.0.6"), 404);
        let refs: Vec<_> =
            produce_references(&CodecovBashUploader, &fetch, FailureMode::Propagate).collect();
        assert!(matches!(
            refs[0],
            Err(CheckError::Fetch(crate::error::FetchError::Status { status: 404, .. }))
        ));
    }
}

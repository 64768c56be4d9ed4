//! Result sinks: where finished verifications are reported.
//!
//! The runner calls a sink exactly once per verification. A sink error is
//! logged by the runner and never changes the verification it was given.

mod airtable;

pub use airtable::AirtableSink;

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;

use crate::config::{HttpConfig, SinkConfig, SinkKind};
use crate::verify::{Status, Verification};

pub trait ResultSink {
    fn accept(&mut self, verification: &Verification) -> Result<()>;
}

/// Flat record shape of the tracking table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SinkRecord {
    #[serde(rename = "Project")]
    pub project: String,
    #[serde(rename = "Version")]
    pub version: String,
    #[serde(rename = "Status")]
    pub status: Status,
    #[serde(rename = "Checksum")]
    pub checksum: String,
    #[serde(rename = "Download")]
    pub download: String,
}

impl From<&Verification> for SinkRecord {
    fn from(v: &Verification) -> Self {
        Self {
            project: v.project_id.clone(),
            version: v.version.label(),
            status: v.status,
            checksum: v.checksum.clone(),
            download: v.download_source.clone(),
        }
    }
}

/// Reports each verification as a tracing event.
#[derive(Debug, Default)]
pub struct LogSink;

impl ResultSink for LogSink {
    fn accept(&mut self, v: &Verification) -> Result<()> {
        tracing::info!(
            project = %v.project_id,
            version = %v.version,
            status = %v.status,
            checksum = %v.checksum,
            download = %v.download_source,
            "check recorded"
        );
        Ok(())
    }
}

/// Writes one `SinkRecord` JSON object per line.
pub struct JsonLinesSink<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ResultSink for JsonLinesSink<W> {
    fn accept(&mut self, v: &Verification) -> Result<()> {
        serde_json::to_writer(&mut self.out, &SinkRecord::from(v)).context("encode record")?;
        self.out.write_all(b"\n").context("write record")?;
        self.out.flush().context("flush record")?;
        Ok(())
    }
}

/// Build the sink selected in config.
pub fn from_config(cfg: &SinkConfig, http: &HttpConfig) -> Result<Box<dyn ResultSink>> {
    let sink: Box<dyn ResultSink> = match cfg.kind {
        SinkKind::Log => Box::new(LogSink),
        SinkKind::JsonLines => Box::new(JsonLinesSink::new(std::io::stdout())),
        SinkKind::Airtable => Box::new(AirtableSink::from_config(cfg, http)?),
    };
    tracing::debug!(kind = ?cfg.kind, "result sink ready");
    Ok(sink)
}

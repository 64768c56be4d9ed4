//! Airtable table sink: one POST per verification.
//!
//! `Project` is a linked-record field with one row per variant. When
//! `sink.airtable_projects` maps the variant to a record id, that record is
//! linked; otherwise the bare project id is sent and Airtable typecasts it,
//! which links every variant of a vendor to the same row.
//!
//! Retention (deleting old rows) is handled outside hecksum.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::time::Duration;

use super::{ResultSink, SinkRecord};
use crate::config::{HttpConfig, SinkConfig};
use crate::fetch::is_success;
use crate::verify::Verification;

#[derive(Debug, Serialize)]
struct CreateRecord {
    fields: serde_json::Value,
    typecast: bool,
}

pub struct AirtableSink {
    url: String,
    api_key: String,
    http: HttpConfig,
    projects: BTreeMap<String, String>,
}

impl AirtableSink {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>, http: HttpConfig) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            http,
            projects: BTreeMap::new(),
        }
    }

    /// Variant key -> `Project` record id.
    pub fn with_projects(mut self, projects: BTreeMap<String, String>) -> Self {
        self.projects = projects;
        self
    }

    /// Table URL comes from config; the token from the environment variable it names.
    pub fn from_config(cfg: &SinkConfig, http: &HttpConfig) -> Result<Self> {
        let Some(url) = cfg.airtable_url.as_deref() else {
            bail!("sink.kind = \"airtable\" requires sink.airtable_url");
        };
        let api_key = std::env::var(&cfg.api_key_env)
            .with_context(|| format!("read Airtable token from ${}", cfg.api_key_env))?;
        Ok(Self::new(url, api_key, http.clone()).with_projects(cfg.airtable_projects.clone()))
    }

    fn body(&self, verification: &Verification) -> Result<Vec<u8>> {
        let mut fields = serde_json::to_value(SinkRecord::from(verification))?;
        if let Some(record_id) = self.projects.get(&project_key(verification)) {
            fields["Project"] = serde_json::json!([record_id]);
        }
        let body = CreateRecord {
            fields,
            typecast: true,
        };
        Ok(serde_json::to_vec(&body)?)
    }
}

impl ResultSink for AirtableSink {
    fn accept(&mut self, verification: &Verification) -> Result<()> {
        let body = self.body(verification)?;

        let mut easy = curl::easy::Easy::new();
        easy.url(&self.url).context("invalid URL")?;
        easy.post(true)?;
        easy.post_field_size(body.len() as u64)?;
        easy.useragent(&self.http.user_agent)?;
        easy.connect_timeout(Duration::from_secs(self.http.connect_timeout_secs))?;
        easy.timeout(Duration::from_secs(self.http.connect_timeout_secs * 4))?;

        let mut list = curl::easy::List::new();
        list.append(&format!("Authorization: Bearer {}", self.api_key))?;
        list.append("Content-Type: application/json")?;
        easy.http_headers(list)?;

        let mut response = Vec::new();
        let mut payload = &body[..];
        {
            let mut transfer = easy.transfer();
            transfer.read_function(|buf| Ok(payload.read(buf).unwrap_or(0)))?;
            transfer.write_function(|data| {
                response.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform().context("POST record failed")?;
        }

        let code = easy.response_code().context("no response code")?;
        if !is_success(code) {
            bail!(
                "POST {} returned HTTP {}: {}",
                self.url,
                code,
                String::from_utf8_lossy(&response).trim()
            );
        }
        tracing::debug!(project = %verification.project_id, "record posted");
        Ok(())
    }
}

/// `"<project> [<os>] [<platform>]"`, the variant a `Project` row stands for.
pub(crate) fn project_key(verification: &Verification) -> String {
    let version = &verification.version;
    std::iter::once(verification.project_id.as_str())
        .chain(version.os.as_deref())
        .chain(version.platform.as_deref())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

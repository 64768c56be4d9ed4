use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use crate::extract::FailureMode;

/// HTTP transport settings (`[http]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Seconds allowed for the TCP/TLS connect phase.
    pub connect_timeout_secs: u64,
    /// Upper bound on a whole request, including large installer downloads.
    pub timeout_secs: u64,
    /// Abort when throughput stays below this many bytes/sec ...
    pub low_speed_limit_bytes: u32,
    /// ... for this many seconds.
    pub low_speed_time_secs: u64,
    /// Receive buffer size; downloads are hashed in chunks of at most this many bytes.
    pub chunk_size: usize,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            timeout_secs: 900,
            low_speed_limit_bytes: 1024,
            low_speed_time_secs: 60,
            chunk_size: 1024 * 1024,
            user_agent: concat!("hecksum/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Where verification results are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SinkKind {
    /// One tracing event per result.
    #[default]
    Log,
    /// One JSON object per line on stdout.
    JsonLines,
    /// POST each result to an Airtable table.
    Airtable,
}

/// Result sink settings (`[sink]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    pub kind: SinkKind,
    /// Table endpoint, e.g. `https://api.airtable.com/v0/<base>/Checks`.
    pub airtable_url: Option<String>,
    /// Name of the environment variable holding the bearer token.
    pub api_key_env: String,
    /// Airtable record id of the `Project` row per variant, keyed by
    /// `"<project> [<os>] [<platform>]"` (e.g. `"doppler linux amd64"`).
    /// Variants without an entry send the bare project id for Airtable to typecast.
    pub airtable_projects: BTreeMap<String, String>,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            kind: SinkKind::Log,
            airtable_url: None,
            api_key_env: "AIRTABLE_API_KEY".to_string(),
            airtable_projects: BTreeMap::new(),
        }
    }
}

/// Global configuration loaded from `~/.config/hecksum/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HecksumConfig {
    /// When true, vendor-side fetch/extraction failures skip that check instead of aborting.
    pub ignore_expected_failures: bool,
    pub http: HttpConfig,
    pub sink: SinkConfig,
}

impl Default for HecksumConfig {
    fn default() -> Self {
        Self {
            ignore_expected_failures: true,
            http: HttpConfig::default(),
            sink: SinkConfig::default(),
        }
    }
}

impl HecksumConfig {
    pub fn failure_mode(&self) -> FailureMode {
        if self.ignore_expected_failures {
            FailureMode::Ignore
        } else {
            FailureMode::Propagate
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("hecksum")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<HecksumConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = HecksumConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: HecksumConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = HecksumConfig::default();
        assert!(cfg.ignore_expected_failures);
        assert_eq!(cfg.failure_mode(), FailureMode::Ignore);
        assert_eq!(cfg.http.connect_timeout_secs, 15);
        assert_eq!(cfg.http.chunk_size, 1024 * 1024);
        assert!(cfg.http.user_agent.starts_with("hecksum/"));
        assert_eq!(cfg.sink.kind, SinkKind::Log);
        assert_eq!(cfg.sink.api_key_env, "AIRTABLE_API_KEY");
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = HecksumConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: HecksumConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.ignore_expected_failures, cfg.ignore_expected_failures);
        assert_eq!(parsed.http.timeout_secs, cfg.http.timeout_secs);
        assert_eq!(parsed.http.user_agent, cfg.http.user_agent);
        assert_eq!(parsed.sink.kind, cfg.sink.kind);
    }

    #[test]
    fn empty_file_uses_defaults() {
        let cfg: HecksumConfig = toml::from_str("").unwrap();
        assert!(cfg.ignore_expected_failures);
        assert_eq!(cfg.http.low_speed_time_secs, 60);
    }

    #[test]
    fn config_toml_debug_mode_propagates() {
        let cfg: HecksumConfig = toml::from_str("ignore_expected_failures = false").unwrap();
        assert_eq!(cfg.failure_mode(), FailureMode::Propagate);
    }

    #[test]
    fn config_toml_partial_sections() {
        let toml = r#"
            [http]
            timeout_secs = 120
            chunk_size = 65536

            [sink]
            kind = "airtable"
            airtable_url = "https://api.airtable.com/v0/appXYZ/Checks"
        "#;
        let cfg: HecksumConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.http.timeout_secs, 120);
        assert_eq!(cfg.http.chunk_size, 65536);
        assert_eq!(cfg.http.connect_timeout_secs, 15);
        assert_eq!(cfg.sink.kind, SinkKind::Airtable);
        assert_eq!(
            cfg.sink.airtable_url.as_deref(),
            Some("https://api.airtable.com/v0/appXYZ/Checks")
        );
        assert_eq!(cfg.sink.api_key_env, "AIRTABLE_API_KEY");
    }

    #[test]
    fn config_toml_airtable_project_records() {
        let toml = r#"
            [sink]
            kind = "airtable"

            [sink.airtable_projects]
            "doppler linux amd64" = "recDopplerLinuxAmd64"
            "codecov-bash-uploader" = "recCodecov"
        "#;
        let cfg: HecksumConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.sink.airtable_projects.len(), 2);
        assert_eq!(
            cfg.sink.airtable_projects.get("doppler linux amd64").map(String::as_str),
            Some("recDopplerLinuxAmd64")
        );
        assert!(HecksumConfig::default().sink.airtable_projects.is_empty());
    }

    #[test]
    fn config_toml_json_lines_sink() {
        let cfg: HecksumConfig = toml::from_str("[sink]\nkind = \"json-lines\"").unwrap();
        assert_eq!(cfg.sink.kind, SinkKind::JsonLines);
    }
}

//! Tests for the run subcommand and extractor selection.

use super::parse;
use crate::cli::commands::{failure_mode, select};
use crate::cli::{Cli, CliCommand, SinkArg};
use clap::Parser;
use hecksum_core::config::HecksumConfig;
use hecksum_core::extract::FailureMode;

#[test]
fn cli_parse_run_defaults() {
    match parse(&["hecksum", "run"]) {
        CliCommand::Run { debug, only, sink } => {
            assert!(!debug);
            assert!(only.is_empty());
            assert!(sink.is_none());
        }
        _ => panic!("expected Run"),
    }
}

#[test]
fn cli_parse_run_debug_only_sink() {
    match parse(&[
        "hecksum",
        "run",
        "--debug",
        "--only",
        "doppler",
        "--only",
        "transmission",
        "--sink",
        "json-lines",
    ]) {
        CliCommand::Run { debug, only, sink } => {
            assert!(debug);
            assert_eq!(only, vec!["doppler", "transmission"]);
            assert_eq!(sink, Some(SinkArg::JsonLines));
        }
        _ => panic!("expected Run with flags"),
    }
}

#[test]
fn cli_parse_run_rejects_unknown_sink() {
    assert!(Cli::try_parse_from(["hecksum", "run", "--sink", "sqlite"]).is_err());
}

#[test]
fn select_all_when_only_is_empty() {
    let names: Vec<_> = select(&[]).unwrap().iter().map(|e| e.name()).collect();
    assert_eq!(names.len(), 4);
}

#[test]
fn select_keeps_registry_order() {
    let only = vec!["doppler".to_string(), "codecov-bash-uploader".to_string()];
    let names: Vec<_> = select(&only).unwrap().iter().map(|e| e.name()).collect();
    assert_eq!(names, vec!["codecov-bash-uploader", "doppler"]);
}

#[test]
fn select_rejects_unknown_name() {
    let err = select(&["npm".to_string()]).err().unwrap();
    assert!(err.to_string().contains("unknown extractor"));
}

#[test]
fn debug_flag_overrides_config() {
    let cfg = HecksumConfig::default();
    assert_eq!(failure_mode(&cfg, false), FailureMode::Ignore);
    assert_eq!(failure_mode(&cfg, true), FailureMode::Propagate);

    let strict = HecksumConfig {
        ignore_expected_failures: false,
        ..HecksumConfig::default()
    };
    assert_eq!(failure_mode(&strict, false), FailureMode::Propagate);
}

//! # Diagnostics Logging
//!
//! `campus-node` writes two streams. Stdout carries the replay report (one
//! JSON line per step, then the summary) and must stay machine-readable, so
//! every `tracing` record goes to stderr instead.
//!
//! Ledger-level diagnostics come from `campus_contracts::SharedLedger`:
//! `debug` for each committed call, `warn` for each rejection. The replay
//! loop adds a `warn` whenever a step diverges from its expectation.

use std::io::IsTerminal;

use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter: run milestones from the tool, rejections from the ledger.
pub const DEFAULT_FILTER: &str = "campus_node=info,campus_contracts=info";

/// Shape of the stderr log stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines, colored when stderr is a terminal.
    Pretty,
    /// One JSON object per record, for collecting alongside the report.
    Json,
}

impl LogFormat {
    /// Reads `--log-format`. Anything other than "json" (any case) falls
    /// back to `Pretty`.
    pub fn from_str_lossy(s: &str) -> Self {
        if s.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

/// Installs the global subscriber on stderr.
///
/// `RUST_LOG` replaces `default_filter` when set, e.g.
/// `RUST_LOG=campus_contracts=debug` to see every committed call.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(default_filter: &str, format: LogFormat) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    match format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(std::io::stderr().is_terminal())
                    .with_target(true),
            )
            .try_init()?,
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(false),
            )
            .try_init()?,
    }

    tracing::debug!(?format, "logging initialized");
    Ok(())
}

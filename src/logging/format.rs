//! Log lines go to stderr (JSON or human format); the run report is one JSON line on stdout.

use crate::pipeline::RunSummary;
use serde::Serialize;
use std::io::Write;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Final line of a run, for the process that launched it.
#[derive(Serialize)]
pub struct RunReport<'a> {
    pub result_dir: &'a str,
    #[serde(flatten)]
    pub summary: &'a RunSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_filter: Option<usize>,
}

pub struct StructuredLogger;

impl StructuredLogger {
    /// Install the global subscriber; `RUST_LOG` overrides `default_level`.
    /// If one is already installed it stays in place and receives a debug line.
    pub fn init(json: bool, default_level: &str) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
        let registry = tracing_subscriber::registry().with(filter);
        let installed = if json {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_span_events(FmtSpan::NONE)
                        .with_writer(std::io::stderr),
                )
                .try_init()
        } else {
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .try_init()
        };
        if let Err(error) = installed {
            tracing::debug!(%error, "keeping existing subscriber");
        }
    }

    /// Write a single JSON line without going through tracing
    pub fn emit_json(event: &impl Serialize, w: &mut impl Write) -> std::io::Result<()> {
        let line = serde_json::to_string(event)?;
        writeln!(w, "{}", line)
    }
}

//! Structured logging setup and the JSON run report.

mod format;

pub use format::{RunReport, StructuredLogger};

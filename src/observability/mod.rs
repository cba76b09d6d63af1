//! Structured logging and OpenTelemetry span export.
//!
//! ```text
//! tracing macros ─┬─▶ EnvFilter ─▶ fmt layer ─▶ stderr
//!                 └─▶ tracing-opentelemetry ─▶ SDK ─▶ FileSpanExporter ─▶ rotating JSON file
//! ```
//!
//! The file export only runs when `trace_file` is configured. Files rotate at
//! 10 MB and keep three backups.
//!
//! # Modules
//!
//! - `init`: subscriber setup
//! - `exporter`: span exporter writing one OTLP JSON document per batch
//! - `rotating`: size-rotated line file

mod exporter;
mod init;
mod rotating;

pub use init::{init_tracing, DEFAULT_LEVEL};

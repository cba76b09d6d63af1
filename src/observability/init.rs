//! Tracing subscriber setup.

use super::exporter::{file_tracer_provider, SCOPE_NAME};
use crate::domain::Result;
use crate::infrastructure::paths;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use std::path::{Path, PathBuf};
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Level used when neither `RUST_LOG` nor `trace_level` is set.
pub const DEFAULT_LEVEL: &str = "info";

/// Installs the global tracing subscriber.
///
/// The filter comes from `RUST_LOG`, then `config.trace_level`, then
/// [`DEFAULT_LEVEL`]. Events go to stderr. When `config.trace_file` is set,
/// spans are also exported as OTLP JSON into that file; a relative path is
/// placed under the data directory.
///
/// Calling this more than once is harmless: only the first subscriber is
/// installed.
///
/// # Errors
///
/// Returns an I/O error if the trace file's directory cannot be created.
pub fn init_tracing(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.trace_level.as_deref().unwrap_or(DEFAULT_LEVEL)));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_target(false)
        .with_writer(std::io::stderr);

    let trace_file = config.trace_file.as_deref().map(resolve_trace_file);
    if let Some(parent) = trace_file.as_deref().and_then(Path::parent) {
        std::fs::create_dir_all(parent)?;
    }

    let otel_layer = trace_file.map(|path| {
        let resource = Resource::new(vec![
            opentelemetry::KeyValue::new("service.name", SCOPE_NAME),
            opentelemetry::KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
        ]);
        let provider = file_tracer_provider(path, resource);
        OpenTelemetryLayer::new(provider.tracer(SCOPE_NAME))
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(otel_layer)
        .try_init();

    tracing::debug!(base_url = %config.base_url, "tracing initialized");
    Ok(())
}

fn resolve_trace_file(path: &Path) -> PathBuf {
    let expanded = path.to_str().map_or_else(|| path.to_path_buf(), paths::expand_tilde);
    if expanded.is_absolute() {
        return expanded;
    }
    paths::data_dir().map_or(expanded.clone(), |dir| dir.join(&expanded))
}

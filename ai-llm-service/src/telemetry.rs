use std::io::{self, IsTerminal};
use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Crate targets whose level is raised by [`env_filter_with_level`].
pub const TARGET_PREFIXES: &[&str] = &["ai_llm_service", "api", "ask_backend"];

/// RFC3339 UTC timer implemented via `chrono`.
/// Example output: `2025-09-12T10:20:30Z`
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        // No fractional seconds, Z-suffix
        let s = now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        w.write_str(&s)
    }
}

/// Build the service-wide formatting layer.
///
/// - RFC3339 UTC timestamps
/// - Compact single-line format
/// - `file:line` and target (module path)
/// - Span close events (request durations from the HTTP trace layer)
/// - ANSI colors only when stdout is a terminal
pub fn layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let use_ansi = io::stdout().is_terminal();

    let format = fmt::format()
        .compact()
        .with_timer(ChronoRfc3339Utc)
        .with_level(true)
        .with_target(true)
        .with_source_location(true);

    fmt::layer()
        .with_ansi(use_ansi)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .event_format(format)
}

/// Level directives for this workspace's crates only, e.g. `api=debug`.
pub fn level_directives(level: Level) -> Vec<Directive> {
    let level = level.as_str().to_lowercase();
    TARGET_PREFIXES
        .iter()
        .filter_map(|target| Directive::from_str(&format!("{target}={level}")).ok())
        .collect()
}

/// Create an EnvFilter from `RUST_LOG`; when it is unset or invalid, fall back
/// to `default` with this workspace's crates raised to `level`.
///
/// With `default = "warn"` and `level = Level::DEBUG`, dependencies log at
/// WARN and the service crates at DEBUG.
pub fn env_filter_with_level(default: &str, level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        level_directives(level)
            .into_iter()
            .fold(EnvFilter::new(default), |filter, directive| {
                filter.add_directive(directive)
            })
    })
}

//! Tracing spans and subscriber setup for scene construction.
//!
//! The engine emits `tracing` events inside a `build_scene` span; hosts
//! install their own subscriber or call [`init_default_tracing`] with the
//! `telemetry` feature.

use tracing::Span;

use crate::config::ChartKind;
use crate::core::Viewport;

/// Environment variable read before `RUST_LOG` for the filter directives.
pub const LOG_ENV_VAR: &str = "CHART_GEOMETRY_LOG";

/// Directive used when neither variable is set.
pub const DEFAULT_DIRECTIVE: &str = "chart_geometry=info";

/// Span wrapping one scene build; every scale fallback and skipped row
/// logged while it is entered carries the chart kind and canvas size.
pub(crate) fn scene_span(kind: ChartKind, rows: usize, viewport: Viewport) -> Span {
    tracing::debug_span!(
        "build_scene",
        kind = ?kind,
        rows,
        width = viewport.width,
        height = viewport.height
    )
}

/// Filter directives from `CHART_GEOMETRY_LOG`, then `RUST_LOG`, then
/// [`DEFAULT_DIRECTIVE`]. Blank values are skipped.
#[must_use]
pub fn filter_directives() -> String {
    [LOG_ENV_VAR, "RUST_LOG"]
        .into_iter()
        .filter_map(|name| std::env::var(name).ok())
        .map(|value| value.trim().to_owned())
        .find(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_DIRECTIVE.to_owned())
}

/// Installs a compact `tracing-subscriber` formatter that closes
/// `build_scene` spans with their timing.
///
/// Returns `false` without the `telemetry` feature, or when the host already
/// set a global subscriber.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;
        use tracing_subscriber::fmt::format::FmtSpan;

        let filter = EnvFilter::try_new(filter_directives())
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .with_target(false)
            .compact();

        return builder.try_init().is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}

//! Diagnostics for conversion runs.
//!
//! The user-facing report (start banner, success or failure text, converter
//! streams) is always printed by `main` and does not depend on this module.
//! Tracing adds what happens around it, on stderr:
//!
//! - `warn`: missing input, converter failure or timeout, truncated converter
//!   output, no artifact, several artifacts matching the extension (with all
//!   candidates and the one taken), a work directory that could not be removed.
//! - `info`: converter command line and the artifact that was installed.
//! - `debug`: stale work directory cleared, spawn and exit details, rename
//!   falling back to copy, work directory removed.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "warn";

/// Install the stderr subscriber, filtered by `RUST_LOG`.
///
/// `RUST_LOG=onnx2tflite=debug` shows the work-directory lifecycle.
pub fn init() {
    let filter = filter_from(std::env::var("RUST_LOG").ok().as_deref());

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

fn filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

//! Tracing subscriber setup.
//!
//! Tracing is opt-in via `RUST_LOG`. Invalid or oversized filters are ignored
//! so embedding applications never fail to start because of a bad variable.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Longest `RUST_LOG` value that will be parsed
const MAX_FILTER_LEN: usize = 4096;

/// Install a global fmt subscriber filtered by `RUST_LOG`
///
/// Returns false if a global subscriber was already installed.
pub fn init() -> bool {
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| parse_filter(&raw))
        .unwrap_or_else(|| EnvFilter::new("off"));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .try_init()
        .is_ok()
}

fn parse_filter(raw: &str) -> Option<EnvFilter> {
    let raw = raw.trim();
    if raw.is_empty() || raw.len() > MAX_FILTER_LEN {
        return None;
    }
    EnvFilter::try_new(raw).ok()
}

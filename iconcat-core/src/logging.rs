//! Structured logging for catalog runs using **tracing**.
//!
//! The JSON subscriber provides machine-readable output for CI logs; the plain
//! subscriber is the default for interactive use. Both write to stderr so that
//! stdout stays clean for generated output and summaries.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "iconcat=info,iconcat_core=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initializes the global tracing subscriber with JSON output.
///
/// Call *once* at the beginning of the application's runtime.
///
/// # Environment Variables
/// - `RUST_LOG`: Controls log filtering (e.g., `RUST_LOG=iconcat_core=debug`)
pub fn init_structured_logging() {
    tracing_subscriber::fmt()
        .json()
        .with_ansi(false)
        .with_level(true)
        .with_target(true)
        .with_current_span(true)
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}

/// Initializes the global tracing subscriber with compact human output.
pub fn init_plain_logging() {
    tracing_subscriber::fmt()
        .compact()
        .with_target(false)
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_is_valid() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }
}

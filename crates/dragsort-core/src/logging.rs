#![forbid(unsafe_code)]

//! Structured logging setup.
//!
//! The crate emits `tracing` events unconditionally; installing a subscriber
//! is the application's choice. With the `tracing-json` feature this module
//! offers a one-call JSON subscriber filtered by `RUST_LOG`.

#[cfg(feature = "tracing-json")]
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "dragsort_core=info";

/// Install a global JSON subscriber.
///
/// Fails if a global subscriber is already set.
#[cfg(feature = "tracing-json")]
pub fn init_json_subscriber() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(true)
        .try_init()
}

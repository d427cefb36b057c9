#![forbid(unsafe_code)]

//! Logging glue.
//!
//! With the `tracing` feature the usual macros are re-exported so downstream
//! crates can log through `sdeck_core::debug!` without naming `tracing`
//! themselves. With `tracing-json` a JSON subscriber can be installed for
//! production hosts.

#[cfg(feature = "tracing")]
pub use tracing::{debug, debug_span, error, info, info_span, trace, warn};

/// Install a global JSON `tracing` subscriber filtered by `RUST_LOG`.
///
/// Returns an error if a global subscriber was already set.
#[cfg(feature = "tracing-json")]
pub fn init_json_logging() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
}

//! Tracing bootstrap for binaries and tests embedding the store.
//!
//! The store only emits `tracing` events; installing a subscriber is left
//! to the host. This helper covers the common case.

use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "fitstore=info";

/// Install a compact fmt subscriber.
///
/// `filter` takes `EnvFilter` directives such as `"fitstore=debug"`. When it
/// is `None` the `RUST_LOG` environment variable is used, and failing that
/// `fitstore=info`. Returns `false` if a global subscriber was already set,
/// so calling this more than once is harmless.
pub fn init_tracing(filter: Option<&str>) -> bool {
    let env_filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };

    fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_a_no_op() {
        init_tracing(Some("fitstore=debug"));
        assert!(!init_tracing(None));
    }
}

//! `tracing` subscriber bootstrap.

use tracing_subscriber::EnvFilter;

/// Default filter: chart crates at `debug`, GPU stack quieted.
pub const DEFAULT_FILTER: &str =
    "info,streamline_chart=debug,streamline_render=debug,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Install a fmt subscriber using [`DEFAULT_FILTER`].
///
/// `RUST_LOG` takes precedence when set. Calling this twice is harmless; the
/// second call leaves the first subscriber in place.
pub fn init() {
    init_with_filter(DEFAULT_FILTER);
}

/// Install a fmt subscriber with a custom filter directive.
pub fn init_with_filter(directives: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

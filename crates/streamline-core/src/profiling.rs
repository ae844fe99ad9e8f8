//! Profiling utilities based on the `puffin` crate.
//!
//! With the `profiling` feature disabled the scope macros compile to nothing
//! and the frame functions are no-ops, so call sites never need `cfg`.

#[cfg(feature = "profiling")]
use std::sync::OnceLock;

#[cfg(feature = "profiling")]
pub use puffin::{profile_function, profile_scope};

#[cfg(not(feature = "profiling"))]
pub use crate::{profile_function, profile_scope};

/// Profiling backend options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfilingBackend {
    /// Serve profiling data to `puffin_viewer` over HTTP.
    PuffinHttp { bind_addr: String },
}

impl Default for ProfilingBackend {
    fn default() -> Self {
        Self::PuffinHttp {
            bind_addr: "127.0.0.1:8585".to_string(),
        }
    }
}

/// Keeps the HTTP server alive for the lifetime of the process.
#[cfg(feature = "profiling")]
static PROFILING_SERVER: OnceLock<puffin_http::Server> = OnceLock::new();

/// Turn on puffin scopes and start the selected backend.
///
/// Failing to bind the server is logged, not fatal: charts render the same
/// without a profiler attached.
///
/// # Example
/// ```no_run
/// use streamline_core::profiling::{init_profiling, ProfilingBackend};
///
/// init_profiling(ProfilingBackend::default());
/// ```
#[cfg(feature = "profiling")]
pub fn init_profiling(backend: ProfilingBackend) {
    match backend {
        ProfilingBackend::PuffinHttp { bind_addr } => {
            puffin::set_scopes_on(true);

            match puffin_http::Server::new(&bind_addr) {
                Ok(server) => {
                    tracing::info!("Puffin profiler server started on http://{bind_addr}");
                    let _ = PROFILING_SERVER.set(server);
                }
                Err(e) => {
                    tracing::error!("Failed to start puffin server on {bind_addr}: {e}");
                }
            }
        }
    }
}

#[cfg(not(feature = "profiling"))]
pub fn init_profiling(backend: ProfilingBackend) {
    tracing::debug!(?backend, "profiling feature disabled; ignoring backend");
}

/// Mark a frame boundary. Call once per rendered chart frame.
#[inline]
pub fn new_frame() {
    #[cfg(feature = "profiling")]
    puffin::GlobalProfiler::lock().new_frame();
}

#[cfg(not(feature = "profiling"))]
#[macro_export]
#[doc(hidden)]
macro_rules! profile_scope {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "profiling"))]
#[macro_export]
#[doc(hidden)]
macro_rules! profile_function {
    ($($arg:tt)*) => {};
}

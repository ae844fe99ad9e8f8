//! Streamline Core
//!
//! Logging bootstrap, profiling helpers and the synchronous [`event::Signal`]
//! used to wire chart models to their renderers.

pub mod event;
pub mod logging;
pub mod profiling;

//! `debug!` and `warn!` for the rest of the crate.
//!
//! With the `tracing` feature these are the `tracing` macros. Without it they
//! discard their arguments, so call sites must not rely on them to use a value.
//! Call them by path: `crate::log::debug!(...)`.

#[cfg(feature = "tracing")]
pub use tracing::{debug, warn};

#[cfg(not(feature = "tracing"))]
#[doc(hidden)]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[doc(hidden)]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub use crate::{debug, warn};

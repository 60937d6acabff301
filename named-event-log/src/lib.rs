//! Logging facade of named-event.
//!
//! All macros expand to nothing unless `enable_log` is on, so the registry
//! hot paths carry no logging cost in default builds.

#[doc(hidden)]
pub use tracing::*;

#[doc(hidden)]
pub mod __private {
    pub use tracing;
}

#[cfg(not(feature = "enable_log"))]
mod dummy;

#[cfg(feature = "enable_log")]
#[macro_export]
macro_rules! debug {
    ($($args:tt)*) => {
        $crate::__private::tracing::debug!($($args)*)
    };
}

#[cfg(feature = "enable_log")]
#[macro_export]
macro_rules! trace {
    ($($args:tt)*) => {
        $crate::__private::tracing::trace!($($args)*)
    };
}

#[cfg(feature = "enable_log")]
#[macro_export]
macro_rules! warn {
    ($($args:tt)*) => {
        $crate::__private::tracing::warn!($($args)*)
    };
}

/// Enter a span for the rest of the enclosing block.
///
/// ```ignore
/// instrument!(named_event_log::Level::TRACE, "set", ?handle);
/// ```
#[cfg(feature = "enable_log")]
#[macro_export]
macro_rules! instrument {
    ($lvl:expr, $name:expr, $($fields:tt)*) => {
        let _guard = $crate::__private::tracing::span!(target: module_path!(), $lvl, $name, $($fields)*).entered();
    };
    ($lvl:expr, $name:expr) => {
        let _guard = $crate::__private::tracing::span!(target: module_path!(), $lvl, $name).entered();
    };
}

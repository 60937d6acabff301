//! Named, reference-counted synchronization events.
//!
//! An event is a waitable boolean. Events can be registered under a name and
//! opened again by that name; every handle to the same object observes the
//! same signal state, whichever handle changed it.
//!
//! ```
//! use std::time::Duration;
//!
//! use named_event::{Access, Registry, WaitStatus};
//!
//! let registry = Registry::new();
//! let event = registry.create(Some("E"), true, false).unwrap();
//! let alias = registry.open("E", Access::ALL, false).unwrap();
//!
//! assert_eq!(registry.wait(alias, Some(Duration::ZERO)).unwrap(), WaitStatus::TimedOut);
//! registry.set(event).unwrap();
//! assert_eq!(registry.wait(alias, Some(Duration::ZERO)).unwrap(), WaitStatus::Signaled);
//! registry.reset(alias).unwrap();
//! assert_eq!(registry.wait(event, Some(Duration::ZERO)).unwrap(), WaitStatus::TimedOut);
//!
//! registry.close(alias).unwrap();
//! registry.close(event).unwrap();
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod builder;
pub mod compat;
mod error;
mod event;
mod handle;
mod registry;
mod wait;

pub use builder::*;
pub use error::{code, Error, Result};
pub use event::WaitStatus;
pub use handle::*;
use once_cell::sync::Lazy;
pub use registry::*;
pub use wait::*;

static GLOBAL: Lazy<Registry> = Lazy::new(Registry::new);

/// The process-wide registry, created with the default config on first use.
pub fn global() -> &'static Registry {
    &GLOBAL
}

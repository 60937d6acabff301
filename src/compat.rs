//! Win32-flavored entry points over the [`global`](crate::global) registry.
//!
//! These report failure the Win32 way: a `bool`, an `Option` or a sentinel
//! wait result, with the reason stored in a per-thread last-error code.
//!
//! ```
//! use named_event::compat::*;
//!
//! let event = create_event(true, false, Some("compat-doc")).unwrap();
//! let alias = open_event(EVENT_ALL_ACCESS, false, "compat-doc").unwrap();
//! assert!(set_event(event));
//! assert_eq!(wait_for_single_object(alias, 0), WAIT_OBJECT_0);
//! assert!(close_handle(alias));
//! assert!(close_handle(event));
//! ```

use std::{cell::Cell, time::Duration};

pub use crate::error::code::*;
use crate::{global, Access, Error, Handle, WaitStatus};

/// Right to set or reset an event.
pub const EVENT_MODIFY_STATE: u32 = Access::MODIFY_STATE.bits();
/// Right to wait on an object.
pub const SYNCHRONIZE: u32 = Access::SYNCHRONIZE.bits();
/// Every event right.
pub const EVENT_ALL_ACCESS: u32 = Access::ALL.bits();

/// Wait forever.
pub const INFINITE: u32 = u32::MAX;
/// The object was signaled.
pub const WAIT_OBJECT_0: u32 = 0;
/// The timeout elapsed.
pub const WAIT_TIMEOUT: u32 = 0x0000_0102;
/// The wait failed, see [`get_last_error`].
pub const WAIT_FAILED: u32 = u32::MAX;

thread_local! {
    static LAST_ERROR: Cell<u32> = const { Cell::new(ERROR_SUCCESS) };
}

/// The last error code recorded on this thread.
pub fn get_last_error() -> u32 {
    LAST_ERROR.with(Cell::get)
}

/// Overwrite the last error code of this thread.
pub fn set_last_error(code: u32) {
    LAST_ERROR.with(|e| e.set(code));
}

fn report<T>(res: Result<T, Error>) -> Option<T> {
    res.map_err(|e| set_last_error(e.code())).ok()
}

/// Create an event, or open the live one with the same name.
///
/// On success the last error is `ERROR_ALREADY_EXISTS` if the name was taken
/// and `ERROR_SUCCESS` otherwise.
pub fn create_event(manual_reset: bool, initial_state: bool, name: Option<&str>) -> Option<Handle> {
    let (handle, existed) = report(global().create_or_open(name, manual_reset, initial_state))?;
    set_last_error(if existed {
        ERROR_ALREADY_EXISTS
    } else {
        ERROR_SUCCESS
    });
    Some(handle)
}

/// Open a new handle to a named event. Unknown bits of `access` are ignored.
pub fn open_event(access: u32, inherit: bool, name: &str) -> Option<Handle> {
    report(global().open(name, Access::from_bits_truncate(access), inherit))
}

/// Signal an event.
pub fn set_event(handle: Handle) -> bool {
    report(global().set(handle)).is_some()
}

/// Clear an event.
pub fn reset_event(handle: Handle) -> bool {
    report(global().reset(handle)).is_some()
}

/// Wait up to `millis` milliseconds, or forever with [`INFINITE`].
///
/// Returns [`WAIT_OBJECT_0`], [`WAIT_TIMEOUT`] or [`WAIT_FAILED`].
pub fn wait_for_single_object(handle: Handle, millis: u32) -> u32 {
    let timeout = (millis != INFINITE).then(|| Duration::from_millis(millis.into()));
    match report(global().wait(handle, timeout)) {
        Some(WaitStatus::Signaled) => WAIT_OBJECT_0,
        Some(WaitStatus::TimedOut) => WAIT_TIMEOUT,
        None => WAIT_FAILED,
    }
}

/// Open another handle to the same event, with the same access.
pub fn duplicate_handle(handle: Handle) -> Option<Handle> {
    report(global().duplicate(handle))
}

/// Close a handle.
pub fn close_handle(handle: Handle) -> bool {
    report(global().close(handle)).is_some()
}

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Access rights granted to a handle.
    ///
    /// The bit values match the Win32 event access mask, so raw masks from
    /// compatibility callers can be converted with [`Access::from_bits_truncate`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Access: u32 {
        /// Query the event. Accepted but not checked by any operation.
        const QUERY_STATE = 0x0000_0001;
        /// Set or reset the event.
        const MODIFY_STATE = 0x0000_0002;
        /// Wait on the event.
        const SYNCHRONIZE = 0x0010_0000;
        /// Every right, the access of handles returned by `create`.
        const ALL = 0x001F_0003;
    }
}

/// An opaque reference to an event object.
///
/// Handles are plain values: copying one does not add a reference, only
/// [`Registry::open`](crate::Registry::open) and
/// [`Registry::duplicate`](crate::Registry::duplicate) do. A handle stays
/// bound to the registry that issued it and becomes invalid once closed, even
/// if its slot is reused later.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    pub(crate) registry: u64,
    pub(crate) key: usize,
    pub(crate) generation: u64,
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({}:{}#{})", self.registry, self.key, self.generation)
    }
}

/// Snapshot of a handle and the object it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleInfo {
    /// Registered name of the object, after namespace normalization.
    pub name: Option<String>,
    /// Whether the object is manual-reset.
    pub manual_reset: bool,
    /// Signal state at the time of the query.
    pub signaled: bool,
    /// Rights granted to this handle.
    pub access: Access,
    /// Whether this handle was opened as inheritable.
    pub inherit: bool,
    /// Live handles referencing the object, this one included.
    pub refs: usize,
    /// Blocked waits queued on the object, threads and futures alike.
    pub waiters: usize,
}

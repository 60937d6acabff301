//! The handle table and name map.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, MutexGuard, PoisonError, Weak,
    },
    time::Duration,
};

use named_event_log::{debug, instrument, trace, warn};
use slab::Slab;

use crate::{
    builder::Config, event::EventObject, Access, Error, EventWait, Handle, HandleInfo,
    NameCollision, RegistryBuilder, Result, WaitStatus,
};

const LOCAL_PREFIX: &str = "Local\\";
const GLOBAL_PREFIX: &str = "Global\\";

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug)]
struct Slot {
    object: Arc<EventObject>,
    access: Access,
    inherit: bool,
    generation: u64,
}

#[derive(Debug)]
struct Inner {
    handles: Slab<Slot>,
    // Weak so that the map never keeps a destroyed object alive; entries are
    // removed when the last handle closes.
    names: HashMap<String, Weak<EventObject>>,
    generation: u64,
}

impl Inner {
    fn insert(
        &mut self,
        registry: u64,
        object: Arc<EventObject>,
        access: Access,
        inherit: bool,
    ) -> Handle {
        object.add_ref();
        self.generation += 1;
        let generation = self.generation;
        let key = self.handles.insert(Slot {
            object,
            access,
            inherit,
            generation,
        });
        Handle {
            registry,
            key,
            generation,
        }
    }

    fn slot(&self, registry: u64, handle: Handle) -> Result<&Slot> {
        if handle.registry != registry {
            return Err(Error::InvalidHandle);
        }
        self.handles
            .get(handle.key)
            .filter(|slot| slot.generation == handle.generation)
            .ok_or(Error::InvalidHandle)
    }

    fn lookup(&self, name: &str) -> Option<Arc<EventObject>> {
        self.names.get(name).and_then(Weak::upgrade)
    }
}

/// A table of event objects and the handles referencing them.
///
/// Every operation on a name or handle is serialized by one registry-wide
/// lock. Signal operations only hold it to resolve the handle; waiting happens
/// outside of it.
///
/// Most programs share [`global()`](crate::global); independent registries are
/// fully isolated, including their namespaces.
#[derive(Debug)]
pub struct Registry {
    id: u64,
    config: Config,
    inner: Mutex<Inner>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Create a registry with the default config.
    pub fn new() -> Self {
        RegistryBuilder::new().build()
    }

    /// Create a [`RegistryBuilder`].
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub(crate) fn with_config(config: Config) -> Self {
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            inner: Mutex::new(Inner {
                handles: Slab::with_capacity(config.capacity),
                names: HashMap::new(),
                generation: 0,
            }),
            config,
        }
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Map a user-supplied name to its key in the name map.
    ///
    /// `Local\` shares the namespace of bare names, `Global\` is a namespace
    /// of its own, and no other separator is allowed.
    fn normalize(&self, name: &str) -> Result<String> {
        let len = name.chars().count();
        if len > self.config.max_name_len {
            return Err(Error::NameTooLong {
                len,
                max: self.config.max_name_len,
            });
        }
        let (key, rest) = if let Some(rest) = name.strip_prefix(LOCAL_PREFIX) {
            (rest, rest)
        } else if let Some(rest) = name.strip_prefix(GLOBAL_PREFIX) {
            (name, rest)
        } else {
            (name, name)
        };
        if rest.is_empty() || rest.contains('\\') {
            return Err(Error::InvalidName(name.to_string()));
        }
        Ok(key.to_string())
    }

    /// Create an event and return a handle with [`Access::ALL`].
    ///
    /// A `None` or empty name creates an unnamed event, reachable only through
    /// the returned handle and its duplicates. When the name is taken, the
    /// registry's [`NameCollision`] policy decides.
    pub fn create(
        &self,
        name: Option<&str>,
        manual_reset: bool,
        initial_state: bool,
    ) -> Result<Handle> {
        self.create_or_open(name, manual_reset, initial_state)
            .map(|(handle, _)| handle)
    }

    /// Like [`Registry::create`], and also report whether the name already
    /// referred to a live object.
    pub fn create_or_open(
        &self,
        name: Option<&str>,
        manual_reset: bool,
        initial_state: bool,
    ) -> Result<(Handle, bool)> {
        instrument!(
            named_event_log::Level::TRACE,
            "create",
            ?name,
            manual_reset,
            initial_state
        );
        let name = match name {
            Some(name) if !name.is_empty() => Some(self.normalize(name)?),
            _ => None,
        };

        let mut inner = self.inner();
        if let Some(name) = &name {
            if let Some(object) = inner.lookup(name) {
                return match self.config.name_collision {
                    NameCollision::Fail => Err(Error::AlreadyExists(name.clone())),
                    NameCollision::OpenExisting => {
                        debug!(name = name.as_str(), "event already exists, opening it");
                        Ok((inner.insert(self.id, object, Access::ALL, false), true))
                    }
                };
            }
        }

        let object = Arc::new(EventObject::new(name.clone(), manual_reset, initial_state));
        if let Some(name) = name {
            debug!(
                name = name.as_str(),
                manual_reset,
                initial_state,
                "named event created"
            );
            inner.names.insert(name, Arc::downgrade(&object));
        }
        Ok((inner.insert(self.id, object, Access::ALL, false), false))
    }

    /// Open a new handle to the live event registered under `name`.
    pub fn open(&self, name: &str, access: Access, inherit: bool) -> Result<Handle> {
        instrument!(named_event_log::Level::TRACE, "open", name, ?access, inherit);
        if name.is_empty() {
            return Err(Error::InvalidParameter("event name must not be empty"));
        }
        let key = self.normalize(name)?;
        let mut inner = self.inner();
        let object = inner.lookup(&key).ok_or(Error::NotFound(key))?;
        Ok(inner.insert(self.id, object, access, inherit))
    }

    /// Open another handle to the object behind `handle`, with the same access
    /// and inherit flag.
    pub fn duplicate(&self, handle: Handle) -> Result<Handle> {
        instrument!(named_event_log::Level::TRACE, "duplicate", ?handle);
        let mut inner = self.inner();
        let slot = inner.slot(self.id, handle)?;
        let (object, access, inherit) = (slot.object.clone(), slot.access, slot.inherit);
        Ok(inner.insert(self.id, object, access, inherit))
    }

    /// Close `handle`. The object is destroyed, and its name released, when
    /// its last handle closes.
    pub fn close(&self, handle: Handle) -> Result<()> {
        instrument!(named_event_log::Level::TRACE, "close", ?handle);
        let mut inner = self.inner();
        inner.slot(self.id, handle)?;
        let slot = inner.handles.remove(handle.key);
        if slot.object.remove_ref() == 0 {
            if let Some(name) = slot.object.name() {
                let registered = inner
                    .names
                    .get(name)
                    .is_some_and(|object| object.as_ptr() == Arc::as_ptr(&slot.object));
                if registered {
                    inner.names.remove(name);
                    debug!(name, "named event destroyed");
                } else {
                    warn!(name, "destroyed event was no longer registered under its name");
                }
            }
        }
        Ok(())
    }

    fn object(&self, handle: Handle, required: Access) -> Result<Arc<EventObject>> {
        let inner = self.inner();
        let slot = inner.slot(self.id, handle)?;
        if !slot.access.contains(required) {
            return Err(Error::AccessDenied);
        }
        Ok(slot.object.clone())
    }

    /// Signal the event. Requires [`Access::MODIFY_STATE`].
    pub fn set(&self, handle: Handle) -> Result<()> {
        instrument!(named_event_log::Level::TRACE, "set", ?handle);
        self.object(handle, Access::MODIFY_STATE)?.set();
        Ok(())
    }

    /// Clear the event. Requires [`Access::MODIFY_STATE`].
    pub fn reset(&self, handle: Handle) -> Result<()> {
        instrument!(named_event_log::Level::TRACE, "reset", ?handle);
        self.object(handle, Access::MODIFY_STATE)?.reset();
        Ok(())
    }

    /// Block until the event is signaled or `timeout` elapses. Requires
    /// [`Access::SYNCHRONIZE`].
    ///
    /// `None` waits forever and `Some(Duration::ZERO)` polls without blocking.
    /// Waiting on an auto-reset event consumes its signal.
    pub fn wait(&self, handle: Handle, timeout: Option<Duration>) -> Result<WaitStatus> {
        instrument!(named_event_log::Level::TRACE, "wait", ?handle, ?timeout);
        let object = self.object(handle, Access::SYNCHRONIZE)?;
        let status = object.wait(timeout);
        if status == WaitStatus::TimedOut {
            trace!(?handle, ?timeout, "wait timed out");
        }
        Ok(status)
    }

    /// Wait for the event asynchronously. Requires [`Access::SYNCHRONIZE`].
    ///
    /// The returned future queues behind earlier waiters like a blocking wait.
    /// It has no timeout of its own; race it against a timer instead.
    pub fn wait_async(&self, handle: Handle) -> Result<EventWait> {
        instrument!(named_event_log::Level::TRACE, "wait_async", ?handle);
        Ok(EventWait::new(self.object(handle, Access::SYNCHRONIZE)?))
    }

    /// Describe `handle` and the object behind it.
    pub fn handle_info(&self, handle: Handle) -> Result<HandleInfo> {
        let inner = self.inner();
        let slot = inner.slot(self.id, handle)?;
        let (signaled, waiters) = slot.object.snapshot();
        Ok(HandleInfo {
            name: slot.object.name().map(str::to_string),
            manual_reset: slot.object.is_manual_reset(),
            signaled,
            access: slot.access,
            inherit: slot.inherit,
            refs: slot.object.refs(),
            waiters,
        })
    }

    /// Number of live named events.
    pub fn len(&self) -> usize {
        self.inner().names.len()
    }

    /// Whether no named event is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of open handles, named or not.
    pub fn handle_count(&self) -> usize {
        self.inner().handles.len()
    }
}

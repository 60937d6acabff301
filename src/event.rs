//! Event objects.
//!
//! An [`EventObject`] is the state shared by every handle that aliases it: the
//! signal flag and a FIFO queue of blocked waiters. Both live behind one mutex,
//! so `set`, `reset` and `wait` never observe each other half-done.
//!
//! The queue keeps one invariant: it is empty whenever the event is signaled.
//! A waiter only queues on an unsignaled event, a manual-reset `set` drains the
//! queue, and an auto-reset `set` with queued waiters hands the signal straight
//! to the oldest one instead of raising the flag.

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    task::Waker,
    thread::{self, Thread},
    time::{Duration, Instant},
};

use futures_util::task::{waker, ArcWake, AtomicWaker};

/// Outcome of a wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaitStatus {
    /// The event was signaled. For an auto-reset event the signal has been
    /// consumed by this wait.
    Signaled,
    /// The timeout elapsed first.
    TimedOut,
}

/// A queued wait, either a parked thread or a pending future.
#[derive(Debug, Default)]
pub(crate) struct Waiter {
    // Only written while the owning event's state is locked.
    released: AtomicBool,
    waker: AtomicWaker,
}

impl Waiter {
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    pub fn register(&self, waker: &Waker) {
        self.waker.register(waker);
    }
}

struct ThreadWaker(Thread);

impl ArcWake for ThreadWaker {
    fn wake_by_ref(arc_self: &Arc<Self>) {
        arc_self.0.unpark();
    }
}

#[derive(Debug)]
struct State {
    signaled: bool,
    waiters: VecDeque<Arc<Waiter>>,
}

/// The object behind one or more handles.
#[derive(Debug)]
pub(crate) struct EventObject {
    name: Option<String>,
    manual_reset: bool,
    // Changed only while the registry lock is held.
    refs: AtomicUsize,
    state: Mutex<State>,
}

impl EventObject {
    /// Create an object with no handles yet.
    pub fn new(name: Option<String>, manual_reset: bool, initial_state: bool) -> Self {
        Self {
            name,
            manual_reset,
            refs: AtomicUsize::new(0),
            state: Mutex::new(State {
                signaled: initial_state,
                waiters: VecDeque::new(),
            }),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_manual_reset(&self) -> bool {
        self.manual_reset
    }

    pub fn refs(&self) -> usize {
        self.refs.load(Ordering::Acquire)
    }

    pub fn add_ref(&self) {
        self.refs.fetch_add(1, Ordering::AcqRel);
    }

    /// Drop one reference and return how many are left.
    pub fn remove_ref(&self) -> usize {
        self.refs.fetch_sub(1, Ordering::AcqRel) - 1
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Signal state and number of blocked waiters, read under one lock and
    /// without consuming the signal.
    pub fn snapshot(&self) -> (bool, usize) {
        let state = self.state();
        (state.signaled, state.waiters.len())
    }

    pub fn set(&self) {
        let released = {
            let mut state = self.state();
            self.signal(&mut state)
        };
        wake_all(released);
    }

    pub fn reset(&self) {
        self.state().signaled = false;
    }

    // Marks the released waiters under the lock; the caller wakes them after
    // unlocking.
    fn signal(&self, state: &mut State) -> VecDeque<Arc<Waiter>> {
        let released = if self.manual_reset {
            state.signaled = true;
            std::mem::take(&mut state.waiters)
        } else if let Some(waiter) = state.waiters.pop_front() {
            VecDeque::from([waiter])
        } else {
            state.signaled = true;
            VecDeque::new()
        };
        for waiter in &released {
            waiter.released.store(true, Ordering::Release);
        }
        released
    }

    fn try_acquire(&self, state: &mut State) -> bool {
        if state.signaled {
            if !self.manual_reset {
                state.signaled = false;
            }
            true
        } else {
            false
        }
    }

    /// Acquire the signal now, or queue a waiter for it.
    ///
    /// Returns `None` when the signal was acquired without queueing.
    pub fn acquire_or_enqueue(&self) -> Option<Arc<Waiter>> {
        let mut state = self.state();
        if self.try_acquire(&mut state) {
            return None;
        }
        let waiter = Arc::new(Waiter::default());
        state.waiters.push_back(waiter.clone());
        Some(waiter)
    }

    /// Block the current thread until signaled or until `timeout` elapses.
    /// `None` waits forever; a zero timeout only polls.
    pub fn wait(&self, timeout: Option<Duration>) -> WaitStatus {
        if timeout == Some(Duration::ZERO) {
            let mut state = self.state();
            return if self.try_acquire(&mut state) {
                WaitStatus::Signaled
            } else {
                WaitStatus::TimedOut
            };
        }

        let Some(waiter) = self.acquire_or_enqueue() else {
            return WaitStatus::Signaled;
        };
        // A timeout too large to represent waits forever.
        let deadline = timeout.and_then(|timeout| Instant::now().checked_add(timeout));
        waiter.register(&waker(Arc::new(ThreadWaker(thread::current()))));

        loop {
            if waiter.is_released() {
                return WaitStatus::Signaled;
            }
            match deadline {
                None => thread::park(),
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        break;
                    }
                    thread::park_timeout(deadline - now);
                }
            }
        }

        if self.cancel(&waiter) {
            WaitStatus::TimedOut
        } else {
            WaitStatus::Signaled
        }
    }

    /// Withdraw a waiter that gave up.
    ///
    /// Returns `false` when the waiter was released before it could be
    /// withdrawn, in which case the caller owns the signal.
    pub fn cancel(&self, waiter: &Arc<Waiter>) -> bool {
        let mut state = self.state();
        if waiter.is_released() {
            return false;
        }
        state.waiters.retain(|w| !Arc::ptr_eq(w, waiter));
        true
    }

    /// Withdraw a waiter that will never report its outcome.
    ///
    /// An auto-reset signal it was already handed passes on to the next waiter,
    /// or back to the event.
    pub fn abandon(&self, waiter: &Arc<Waiter>) {
        let released = {
            let mut state = self.state();
            if !waiter.is_released() {
                state.waiters.retain(|w| !Arc::ptr_eq(w, waiter));
                return;
            }
            if self.manual_reset {
                return;
            }
            self.signal(&mut state)
        };
        wake_all(released);
    }
}

fn wake_all(waiters: VecDeque<Arc<Waiter>>) {
    for waiter in waiters {
        waiter.waker.wake();
    }
}

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use crate::{
    event::{EventObject, Waiter},
    WaitStatus,
};

#[derive(Debug)]
enum Stage {
    Init,
    Queued(Arc<Waiter>),
    Done,
}

/// Future returned by [`Registry::wait_async`](crate::Registry::wait_async).
///
/// Resolves to [`WaitStatus::Signaled`]. The future keeps the event object
/// alive, so closing the handle it was created from does not cancel it.
/// Dropping it before completion withdraws it from the queue without losing an
/// auto-reset signal.
#[derive(Debug)]
#[must_use = "futures do nothing unless polled"]
pub struct EventWait {
    object: Arc<EventObject>,
    stage: Stage,
}

impl EventWait {
    pub(crate) fn new(object: Arc<EventObject>) -> Self {
        Self {
            object,
            stage: Stage::Init,
        }
    }
}

impl Future for EventWait {
    type Output = WaitStatus;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<WaitStatus> {
        let this = self.get_mut();
        let waiter = match &this.stage {
            Stage::Init => match this.object.acquire_or_enqueue() {
                None => {
                    this.stage = Stage::Done;
                    return Poll::Ready(WaitStatus::Signaled);
                }
                Some(waiter) => {
                    this.stage = Stage::Queued(waiter.clone());
                    waiter
                }
            },
            Stage::Queued(waiter) => waiter.clone(),
            Stage::Done => panic!("`EventWait` polled after completion"),
        };

        // quick check to avoid registration if already done.
        if waiter.is_released() {
            this.stage = Stage::Done;
            return Poll::Ready(WaitStatus::Signaled);
        }

        waiter.register(cx.waker());

        // Need to check condition **after** `register` to avoid a race
        // condition that would result in lost notifications.
        if waiter.is_released() {
            this.stage = Stage::Done;
            Poll::Ready(WaitStatus::Signaled)
        } else {
            Poll::Pending
        }
    }
}

impl Drop for EventWait {
    fn drop(&mut self) {
        if let Stage::Queued(waiter) = &self.stage {
            self.object.abandon(waiter);
        }
    }
}

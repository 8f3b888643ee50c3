//! Spawned requests with an explicit "no longer interested" signal.
//!
//! DESIGN
//! ======
//! UI code often fires a request and moves on (a page is left, a dialog is
//! closed). [`RequestHandle::spawn`] runs the request on the tokio runtime
//! and invokes a completion callback with the outcome. The callback lives in
//! a shared slot that is taken exactly once, either by the task when the
//! outcome is ready or by [`RequestHandle::cancel`]. Whoever takes it first
//! wins, so an outcome is delivered at most once and never after a
//! successful cancel.
//!
//! Cancelling also aborts the task. The HTTP request may already be on the
//! wire; its response is dropped unread.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::JoinHandle;

use crate::error::RequestOutcome;

type Completion<R> = Box<dyn FnOnce(RequestOutcome<R>) + Send>;
type Slot<R> = Arc<Mutex<Option<Completion<R>>>>;

/// Handle to a request running in the background.
///
/// Dropping the handle detaches the request; the callback still runs.
pub struct RequestHandle<R> {
    slot: Slot<R>,
    task: JoinHandle<()>,
}

impl<R: Send + 'static> RequestHandle<R> {
    /// Spawn `request` and deliver its outcome to `on_complete`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F, C>(request: F, on_complete: C) -> Self
    where
        F: Future<Output = RequestOutcome<R>> + Send + 'static,
        C: FnOnce(RequestOutcome<R>) + Send + 'static,
    {
        let slot: Slot<R> = Arc::new(Mutex::new(Some(Box::new(on_complete))));
        let task_slot = Arc::clone(&slot);
        let task = tokio::spawn(async move {
            let outcome = request.await;
            match take(&task_slot) {
                Some(complete) => complete(outcome),
                None => tracing::debug!("dropping outcome of cancelled request"),
            }
        });
        Self { slot, task }
    }
}

impl<R> RequestHandle<R> {
    /// Withdraw interest in the outcome.
    ///
    /// Returns `true` if the callback had not been claimed yet; it is then
    /// guaranteed never to run. Returns `false` if the outcome was already
    /// delivered (or is being delivered).
    pub fn cancel(&self) -> bool {
        let withdrawn = take(&self.slot).is_some();
        self.task.abort();
        withdrawn
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

fn take<R>(slot: &Slot<R>) -> Option<Completion<R>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner).take()
}

#[cfg(test)]
#[path = "pending_test.rs"]
mod tests;
